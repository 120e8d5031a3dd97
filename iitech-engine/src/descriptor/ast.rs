//! Descriptor AST

/// A unit of renderable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDescriptor {
    Text(String),
    Sequence(Vec<ContentDescriptor>),
    Image {
        source: String,
        caption: Option<Box<ContentDescriptor>>,
    },
    Hyperlink {
        url: String,
        text: Option<Box<ContentDescriptor>>,
    },
    Email {
        address: String,
        text: Option<Box<ContentDescriptor>>,
    },
    Anchor {
        name: String,
        text: Option<Box<ContentDescriptor>>,
    },
    Jump {
        anchor: String,
        text: Option<Box<ContentDescriptor>>,
    },
    FileLink {
        path: String,
        text: Option<Box<ContentDescriptor>>,
    },
    Bold(Box<ContentDescriptor>),
    Italics(Box<ContentDescriptor>),
    Underline(Box<ContentDescriptor>),
    NumberedList(Vec<ContentDescriptor>),
    BulletedList(Vec<ContentDescriptor>),
}

impl ContentDescriptor {
    pub fn text(text: impl Into<String>) -> Self {
        ContentDescriptor::Text(text.into())
    }

    pub fn bold(inner: ContentDescriptor) -> Self {
        ContentDescriptor::Bold(Box::new(inner))
    }

    pub fn italics(inner: ContentDescriptor) -> Self {
        ContentDescriptor::Italics(Box::new(inner))
    }

    pub fn underline(inner: ContentDescriptor) -> Self {
        ContentDescriptor::Underline(Box::new(inner))
    }
}

impl From<&str> for ContentDescriptor {
    fn from(text: &str) -> Self {
        ContentDescriptor::Text(text.to_string())
    }
}

/// The kind keys an attribute group may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Image,
    Link,
    Email,
    Anchor,
    Jump,
    File,
    Bold,
    Italics,
    Underline,
    Numbers,
    Bullets,
}

impl DescriptorKind {
    pub const ALL: [DescriptorKind; 11] = [
        DescriptorKind::Image,
        DescriptorKind::Link,
        DescriptorKind::Email,
        DescriptorKind::Anchor,
        DescriptorKind::Jump,
        DescriptorKind::File,
        DescriptorKind::Bold,
        DescriptorKind::Italics,
        DescriptorKind::Underline,
        DescriptorKind::Numbers,
        DescriptorKind::Bullets,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DescriptorKind::Image => "image",
            DescriptorKind::Link => "link",
            DescriptorKind::Email => "email",
            DescriptorKind::Anchor => "anchor",
            DescriptorKind::Jump => "jump",
            DescriptorKind::File => "file",
            DescriptorKind::Bold => "bold",
            DescriptorKind::Italics => "italics",
            DescriptorKind::Underline => "underline",
            DescriptorKind::Numbers => "numbers",
            DescriptorKind::Bullets => "bullets",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Whether the kind accepts a `text` key for its display text.
    pub fn takes_text(self) -> bool {
        matches!(
            self,
            DescriptorKind::Link
                | DescriptorKind::Email
                | DescriptorKind::Anchor
                | DescriptorKind::Jump
                | DescriptorKind::File
        )
    }

    /// Whether the kind accepts a `caption` key.
    pub fn takes_caption(self) -> bool {
        self == DescriptorKind::Image
    }
}

/// Descriptors rendered back to back as one line or block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub items: Vec<ContentDescriptor>,
}

impl Paragraph {
    pub fn new(items: Vec<ContentDescriptor>) -> Self {
        Self { items }
    }

    pub fn single(item: ContentDescriptor) -> Self {
        Self { items: vec![item] }
    }
}

impl From<&str> for Paragraph {
    fn from(text: &str) -> Self {
        Paragraph::single(ContentDescriptor::from(text))
    }
}
