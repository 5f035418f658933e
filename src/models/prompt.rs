use std::fmt;

/// A style instruction sent alongside each uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptSpec(&'static str);

impl PromptSpec {
    pub const fn new(text: &'static str) -> Self {
        Self(text)
    }

    pub fn text(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PromptSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const PASSPORT_PROMPTS: [PromptSpec; 5] = [
    PromptSpec::new("A professional passport-sized photo wearing a crisp white shirt, a black suit, and a classic black tie. The background should be plain white."),
    PromptSpec::new("Generate a studio-quality passport photo. The subject should be wearing a light blue formal shirt with a dark navy blue suit. Plain off-white background."),
    PromptSpec::new("Create a passport-style headshot with the person wearing a simple, professional dark grey suit and a white shirt. No tie. Neutral, light grey background."),
    PromptSpec::new("Transform this into a formal passport photograph. The person is wearing a black suit and a patterned red tie over a white shirt, with a standard passport photo background."),
    PromptSpec::new("A professional passport-sized photo wearing a white shirt. The background should be plain white."),
];

pub fn passport_catalog() -> &'static [PromptSpec] {
    &PASSPORT_PROMPTS
}
