//! The tag and attribute names the builder knows about.
//!
//! Both sets are closed enums with a `Custom` escape hatch, so a single parameterized constructor
//! ([`crate::Tag::child`]) and a single setter ([`crate::Tag::set_attr`]) cover every name.

use std::fmt::Display;
use tagstream_dom::is_void_element;

macro_rules! name_enum {
    (
        $(#[$enum_attr:meta])*
        pub enum $ty:ident {
            $(
                $(#[$attr:meta])*
                $variant:ident => $name:literal,
            )*
        }
    ) => {
        $(#[$enum_attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $(
                $(#[$attr])*
                $variant,
            )*

            /// A name outside the recognized set. It is written verbatim, so it must be a valid markup name.
            Custom(&'static str),
        }

        impl $ty {
            /// Every recognized name, in declaration order. Does not include `Custom`.
            pub const ALL: &'static [$ty] = &[$($ty::$variant,)*];

            /// The name as it appears in markup
            pub const fn as_str(&self) -> &'static str {
                match *self {
                    $( $ty::$variant => $name, )*
                    $ty::Custom(name) => name,
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Organized roughly in the same order as
// https://developer.mozilla.org/en-US/docs/Web/HTML/Element
name_enum! {
    /// An HTML element name.
    pub enum TagName {
        Html => "html",
        Head => "head",
        Title => "title",
        Base => "base",
        Link => "link",
        Meta => "meta",
        Style => "style",
        Body => "body",

        Address => "address",
        Article => "article",
        Aside => "aside",
        Footer => "footer",
        Header => "header",
        H1 => "h1",
        H2 => "h2",
        H3 => "h3",
        H4 => "h4",
        H5 => "h5",
        H6 => "h6",
        Main => "main",
        Nav => "nav",
        Section => "section",

        Blockquote => "blockquote",
        Dd => "dd",
        Div => "div",
        Dl => "dl",
        Dt => "dt",
        Figcaption => "figcaption",
        Figure => "figure",
        Hr => "hr",
        Li => "li",
        Menu => "menu",
        Ol => "ol",
        P => "p",
        Pre => "pre",
        Ul => "ul",

        A => "a",
        Abbr => "abbr",
        B => "b",
        Bdi => "bdi",
        Bdo => "bdo",
        Br => "br",
        Cite => "cite",
        Code => "code",
        Data => "data",
        Dfn => "dfn",
        Em => "em",
        I => "i",
        Kbd => "kbd",
        Mark => "mark",
        Q => "q",
        Rp => "rp",
        Rt => "rt",
        Ruby => "ruby",
        S => "s",
        Samp => "samp",
        Small => "small",
        Span => "span",
        Strong => "strong",
        Sub => "sub",
        Sup => "sup",
        Time => "time",
        U => "u",
        Var => "var",
        Wbr => "wbr",

        Area => "area",
        Audio => "audio",
        Img => "img",
        Map => "map",
        Track => "track",
        Video => "video",

        Embed => "embed",
        Iframe => "iframe",
        Object => "object",
        Param => "param",
        Picture => "picture",
        Source => "source",

        Canvas => "canvas",
        Noscript => "noscript",
        Script => "script",

        Del => "del",
        Ins => "ins",

        Caption => "caption",
        Col => "col",
        Colgroup => "colgroup",
        Table => "table",
        Tbody => "tbody",
        Td => "td",
        Tfoot => "tfoot",
        Th => "th",
        Thead => "thead",
        Tr => "tr",

        Button => "button",
        Datalist => "datalist",
        Fieldset => "fieldset",
        Form => "form",
        Input => "input",
        Label => "label",
        Legend => "legend",
        Meter => "meter",
        Optgroup => "optgroup",
        Option => "option",
        Output => "output",
        Progress => "progress",
        Select => "select",
        Textarea => "textarea",

        Details => "details",
        Dialog => "dialog",
        Summary => "summary",

        Template => "template",
    }
}

impl TagName {
    /// Whether the element can never have content. Void elements are written as `<tag/>`.
    pub fn is_void(&self) -> bool {
        is_void_element(self.as_str())
    }

    /// The tag [`crate::Tag::map_children`] opens for each item under this tag.
    pub fn default_child(&self) -> TagName {
        match self {
            TagName::Ul | TagName::Ol | TagName::Menu => TagName::Li,
            TagName::Table | TagName::Thead | TagName::Tbody | TagName::Tfoot => TagName::Tr,
            TagName::Tr => TagName::Td,
            TagName::Select | TagName::Optgroup | TagName::Datalist => TagName::Option,
            TagName::Dl => TagName::Dt,
            _ => TagName::Div,
        }
    }
}

name_enum! {
    /// An HTML attribute name.
    ///
    /// `data-*` attributes are set through [`crate::Tag::data`] and inline styles through
    /// [`crate::Tag::set_style`].
    pub enum AttrName {
        Id => "id",
        Class => "class",
        Style => "style",
        Title => "title",
        Lang => "lang",
        Dir => "dir",
        Hidden => "hidden",
        Role => "role",
        TabIndex => "tabindex",
        AccessKey => "accesskey",
        ContentEditable => "contenteditable",
        Draggable => "draggable",
        SpellCheck => "spellcheck",

        Href => "href",
        Target => "target",
        Rel => "rel",
        Download => "download",
        HrefLang => "hreflang",

        Src => "src",
        SrcSet => "srcset",
        Sizes => "sizes",
        Alt => "alt",
        Width => "width",
        Height => "height",
        UseMap => "usemap",
        Poster => "poster",
        Controls => "controls",
        AutoPlay => "autoplay",
        Loop => "loop",
        Muted => "muted",
        Preload => "preload",
        Media => "media",
        Sandbox => "sandbox",
        SrcDoc => "srcdoc",

        Action => "action",
        Method => "method",
        EncType => "enctype",
        AcceptCharset => "accept-charset",
        NoValidate => "novalidate",
        Name => "name",
        Value => "value",
        /// The `type` attribute
        Type => "type",
        Placeholder => "placeholder",
        Checked => "checked",
        Selected => "selected",
        Multiple => "multiple",
        Disabled => "disabled",
        ReadOnly => "readonly",
        Required => "required",
        AutoComplete => "autocomplete",
        AutoFocus => "autofocus",
        Min => "min",
        Max => "max",
        Step => "step",
        Pattern => "pattern",
        Size => "size",
        MaxLength => "maxlength",
        MinLength => "minlength",
        Accept => "accept",
        /// The `for` attribute of labels and outputs
        For => "for",
        Form => "form",
        Label => "label",
        Rows => "rows",
        Cols => "cols",
        Wrap => "wrap",

        ColSpan => "colspan",
        RowSpan => "rowspan",
        Headers => "headers",
        Scope => "scope",
        Span => "span",

        Start => "start",
        Reversed => "reversed",
        Cite => "cite",
        DateTime => "datetime",
        Open => "open",

        Charset => "charset",
        Content => "content",
        HttpEquiv => "http-equiv",
        Async => "async",
        Defer => "defer",
        CrossOrigin => "crossorigin",
        Integrity => "integrity",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercase_markup() {
        for tag in TagName::ALL {
            assert_eq!(tag.as_str(), tag.as_str().to_lowercase());
        }
        assert_eq!(TagName::Custom("my-widget").as_str(), "my-widget");
        assert_eq!(AttrName::Type.to_string(), "type");
        assert_eq!(AttrName::AcceptCharset.as_str(), "accept-charset");
    }

    #[test]
    fn void_tags() {
        let void: Vec<_> = TagName::ALL.iter().filter(|tag| tag.is_void()).collect();
        assert!(void.contains(&&TagName::Img));
        assert!(void.contains(&&TagName::Input));
        assert!(!TagName::Div.is_void());
        assert!(!TagName::Custom("x-img").is_void());
    }

    #[test]
    fn default_children() {
        assert_eq!(TagName::Ul.default_child(), TagName::Li);
        assert_eq!(TagName::Tbody.default_child(), TagName::Tr);
        assert_eq!(TagName::Tr.default_child(), TagName::Td);
        assert_eq!(TagName::Select.default_child(), TagName::Option);
        assert_eq!(TagName::Dl.default_child(), TagName::Dt);
        assert_eq!(TagName::Section.default_child(), TagName::Div);
    }
}
