//! TRACULA configuration (dmrirc) rendering
//!
//! trac-all sources the dmrirc as a csh script, so a later `set` overrides an
//! earlier one. A user-supplied base config is emitted first and the generated
//! settings after it.

use std::fmt::Write as _;
use std::path::Path;

use crate::domain::entities::{PipelineOptions, Study};

/// Generated dmrirc for one study.
#[derive(Debug, Clone)]
pub struct Dmrirc<'a> {
    study: &'a Study,
    options: PipelineOptions,
    subjects_dir: Option<&'a Path>,
    base: Option<&'a str>,
}

impl<'a> Dmrirc<'a> {
    pub fn new(study: &'a Study, options: PipelineOptions) -> Self {
        Self {
            study,
            options,
            subjects_dir: None,
            base: None,
        }
    }

    pub fn with_subjects_dir(mut self, subjects_dir: Option<&'a Path>) -> Self {
        self.subjects_dir = subjects_dir;
        self
    }

    /// Content of a user dmrirc to prepend.
    pub fn with_base(mut self, base: Option<&'a str>) -> Self {
        self.base = base;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(base) = self.base {
            out.push_str(base);
            if !base.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str("# generated by tracall\n");
        if let Some(dir) = self.subjects_dir {
            let _ = writeln!(out, "setenv SUBJECTS_DIR {}", quote_path(dir));
        }
        let _ = writeln!(out, "set dtroot = {}", quote_path(self.study.outdir()));

        let sessions = self.study.sessions();
        let ids: Vec<String> = sessions.iter().map(|s| quote(&s.id)).collect();
        let _ = writeln!(out, "set subjlist = ({})", ids.join(" "));

        if let Some(template) = self.study.template_id() {
            let bases: Vec<String> = sessions.iter().map(|_| quote(template)).collect();
            let _ = writeln!(out, "set baselist = ({})", bases.join(" "));
        }

        let _ = writeln!(
            out,
            "set dcmlist = ({})",
            list(sessions.iter().map(|s| s.scan.dwi.as_path()))
        );
        let _ = writeln!(
            out,
            "set bveclist = ({})",
            list(sessions.iter().map(|s| s.scan.bvecs.as_path()))
        );
        let _ = writeln!(
            out,
            "set bvallist = ({})",
            list(sessions.iter().map(|s| s.scan.bvals.as_path()))
        );

        let _ = writeln!(out, "set doeddy = {}", flag(self.options.do_eddy));
        let _ = writeln!(out, "set dorotbvecs = {}", flag(self.options.rotate_bvecs));
        let _ = writeln!(out, "set doregbbr = {}", flag(self.options.bbregister));
        let _ = writeln!(out, "set doregmni = {}", flag(self.options.register_mni));

        out
    }
}

fn flag(on: bool) -> u8 {
    u8::from(on)
}

fn list<'p>(paths: impl Iterator<Item = &'p Path>) -> String {
    paths.map(quote_path).collect::<Vec<_>>().join(" ")
}

fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

/// Single-quote a word if csh would split or expand it.
///
/// csh expands `$` and backticks inside double quotes, so only single quotes
/// are safe. An embedded `'` is written as `'\''`.
fn quote(word: &str) -> String {
    let needs_quotes = word.is_empty()
        || word
            .chars()
            .any(|c| c.is_whitespace() || "()'\"`$~\\&;|<>*?[]{}!#^".contains(c));
    if needs_quotes {
        format!("'{}'", word.replace('\'', "'\\''"))
    } else {
        word.to_string()
    }
}
