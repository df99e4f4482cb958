//! Tag vocabulary of the document markup.

/// Every element name the markup understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    P,
    Ul,
    Ol,
    Li,
    Dl,
    Dt,
    Dd,
    B,
    Strong,
    I,
    Em,
    U,
    S,
    Span,
    A,
    Code,
    Br,
}

const ALL: [Tag; 17] = [
    Tag::P,
    Tag::Ul,
    Tag::Ol,
    Tag::Li,
    Tag::Dl,
    Tag::Dt,
    Tag::Dd,
    Tag::B,
    Tag::Strong,
    Tag::I,
    Tag::Em,
    Tag::U,
    Tag::S,
    Tag::Span,
    Tag::A,
    Tag::Code,
    Tag::Br,
];

impl Tag {
    /// Look up a tag by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Tag> {
        ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Tag::P => "p",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Dl => "dl",
            Tag::Dt => "dt",
            Tag::Dd => "dd",
            Tag::B => "b",
            Tag::Strong => "strong",
            Tag::I => "i",
            Tag::Em => "em",
            Tag::U => "u",
            Tag::S => "s",
            Tag::Span => "span",
            Tag::A => "a",
            Tag::Code => "code",
            Tag::Br => "br",
        }
    }

    /// Void elements never have children or a closing tag.
    pub fn is_void(self) -> bool {
        matches!(self, Tag::Br)
    }

    /// Phrasing elements that wrap text inside a block.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Tag::B
                | Tag::Strong
                | Tag::I
                | Tag::Em
                | Tag::U
                | Tag::S
                | Tag::Span
                | Tag::A
                | Tag::Code
                | Tag::Br
        )
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
