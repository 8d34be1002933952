use std::path::Path;

use tera::{Context, Tera};
use thiserror::Error;

use crate::models::Variables;

/// Errors from turning a JSON template plus variables into a payload.
/// All abort the profile being rendered; nothing is sent to Central.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template '{file}' not found")]
    TemplateNotFound { file: String },

    #[error("error rendering template '{file}': {source}")]
    Render { file: String, source: tera::Error },

    #[error("rendered template '{file}' is not valid JSON: {source}")]
    InvalidJson {
        file: String,
        source: serde_json::Error,
    },
}

/// Render a JSON profile template with the variables file's values.
/// The rendered text must itself parse as JSON before it is used.
pub fn render_profile(
    templates_dir: &Path,
    template_file: &str,
    variables: &Variables,
) -> Result<serde_json::Value, RenderError> {
    let path = templates_dir.join(template_file);
    let content = std::fs::read_to_string(&path).map_err(|_| RenderError::TemplateNotFound {
        file: template_file.to_string(),
    })?;

    let mut tera = Tera::default();
    tera.add_raw_template(template_file, &content)
        .map_err(|e| RenderError::Render {
            file: template_file.to_string(),
            source: e,
        })?;

    let context = Context::from_serialize(variables).map_err(|e| RenderError::Render {
        file: template_file.to_string(),
        source: e,
    })?;

    let rendered = tera
        .render(template_file, &context)
        .map_err(|e| RenderError::Render {
            file: template_file.to_string(),
            source: e,
        })?;

    serde_json::from_str(&rendered).map_err(|e| RenderError::InvalidJson {
        file: template_file.to_string(),
        source: e,
    })
}
