//! Literal `{{key}}` substitution.
//!
//! Placeholders whose key is missing from the snapshot are left in the
//! output untouched. There is no escaping, nesting or conditional syntax.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::RenderError;
use crate::metrics::MetricsSnapshot;

pub trait Renderer {
    fn render(&self, template: &str, snapshot: &MetricsSnapshot) -> String;
}

pub fn placeholder(key: &str) -> String {
    format!("{{{{{key}}}}}")
}

/// Replaces every occurrence of each snapshot key's placeholder with its
/// value, one key at a time in key order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRenderer;

impl Renderer for PlaceholderRenderer {
    fn render(&self, template: &str, snapshot: &MetricsSnapshot) -> String {
        let mut output = template.to_string();
        for (key, value) in snapshot.iter() {
            let token = placeholder(key);
            if output.contains(&token) {
                output = output.replace(&token, value);
            }
        }
        output
    }
}

pub fn load_template(path: &Path) -> Result<String, RenderError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => RenderError::TemplateNotFound(path.to_path_buf()),
        _ => RenderError::TemplateUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Renders `template_path` into `output_path`, replacing the whole file.
pub fn render_to_file<R: Renderer + ?Sized>(
    renderer: &R,
    template_path: &Path,
    output_path: &Path,
    snapshot: &MetricsSnapshot,
) -> Result<(), RenderError> {
    let template = load_template(template_path)?;
    let rendered = renderer.render(&template, snapshot);
    fs::write(output_path, rendered).map_err(|source| RenderError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}
