use serde::{Deserialize, Serialize};

/// Prompt classifier keyword sets managed by Figment.
///
/// Both sets are plain configuration so routing can be tuned without a
/// rebuild. Matching is case-insensitive and word-boundary aware, so the
/// defaults below are stored lowercase and may contain multi-word phrases.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Keywords that route a prompt to the image provider class.
    /// TOML: `classifier.image_keywords`.
    #[serde(default = "default_image_keywords")]
    pub image_keywords: Vec<String>,

    /// Keywords that force the text route even when image keywords are
    /// present. Requests about code must never reach an image provider just
    /// because they mention a visual noun.
    /// TOML: `classifier.code_keywords`.
    #[serde(default = "default_code_keywords")]
    pub code_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            image_keywords: default_image_keywords(),
            code_keywords: default_code_keywords(),
        }
    }
}

fn default_image_keywords() -> Vec<String> {
    [
        "image",
        "generate",
        "draw",
        "create",
        "illustrate",
        "picture",
        "logo",
        "avatar",
        "portrait",
        "scene",
        "render",
        "paint",
        "sketch",
        "photo",
        "photograph",
        "visual",
        "graphic",
        "design",
        "cinematic",
        "4k",
        "8k",
        "ultra hd",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_code_keywords() -> Vec<String> {
    [
        "code",
        "python",
        "function",
        "script",
        "bug",
        "algorithm",
        "c++",
        "java",
        "javascript",
        "html",
        "css",
        "ruby",
        "rust",
        "typescript",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
