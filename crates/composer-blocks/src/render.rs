//! Pure HTML renderers for every block kind.
//!
//! Each function here maps content to markup and nothing else: no I/O, no
//! global state. The same block always renders to the same string.

use crate::{
    BlockContent, BlockId, ButtonContent, CalloutContent, CarouselContent, CodeContent,
    CollapsibleContent, ColumnsContent, EmbedContent, HeadingContent, ImageContent, ListContent,
    MapContent, QuoteContent, SectionContent, SocialContent, VideoContent, YoutubeContent,
};

const EDITABLE_ATTR: &str = "contenteditable=\"true\"";

/// Whether markup is produced for the editing canvas or for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Editing surface: editable regions and picker hooks are present
    #[default]
    Edit,
    /// Compiled output: no editability affordances
    Export,
}

impl RenderMode {
    fn editable(self) -> &'static str {
        match self {
            RenderMode::Edit => " contenteditable=\"true\"",
            RenderMode::Export => "",
        }
    }
}

/// Escapes text for use in HTML content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Removes every `contenteditable="true"` attribute from markup.
pub fn strip_editable(markup: &str) -> String {
    markup
        .replace(&format!(" {EDITABLE_ATTR}"), "")
        .replace(EDITABLE_ATTR, "")
}

/// Visual description of an empty media block.
struct Placeholder<'a> {
    aspect: &'a str,
    color: &'a str,
    icon: &'a str,
    label: &'a str,
    action: &'a str,
}

fn placeholder(id: &BlockId, mode: RenderMode, p: Placeholder<'_>) -> String {
    let hook = match mode {
        RenderMode::Edit => format!(
            " data-action=\"{}\" data-block-id=\"{}\"",
            p.action,
            escape_html(id.as_str())
        ),
        RenderMode::Export => String::new(),
    };
    format!(
        "<div class=\"{aspect} bg-{c}-50 dark:bg-{c}-900/20 rounded-lg flex flex-col items-center justify-center border border-{c}-200 dark:border-{c}-800\"{hook}>\
<span class=\"material-symbols-outlined text-4xl text-{c}-500 mb-2\">{icon}</span>\
<span class=\"text-sm text-{c}-600 dark:text-{c}-400\">{label}</span></div>",
        aspect = p.aspect,
        c = p.color,
        icon = p.icon,
        label = p.label,
    )
}

fn frame(aspect: &str, src: &str, fullscreen: bool) -> String {
    let allow = if fullscreen { " allowfullscreen" } else { "" };
    format!(
        "<div class=\"{aspect} rounded-lg overflow-hidden border border-slate-200 dark:border-slate-700\">\
<iframe src=\"{}\" class=\"w-full h-full\"{allow}></iframe></div>",
        escape_html(src)
    )
}

impl BlockContent {
    /// Renders this content.
    ///
    /// `id` is only used for picker hooks in [`RenderMode::Edit`].
    /// `children` is embedded by container kinds and ignored otherwise.
    pub fn render(&self, id: &BlockId, children: Option<&str>, mode: RenderMode) -> String {
        let children = children.unwrap_or_default();
        match self {
            BlockContent::Heading(c) => heading(c, mode),
            BlockContent::Paragraph(c) => format!(
                "<p class=\"text-base text-slate-700 dark:text-slate-300 leading-relaxed\"{}>{}</p>",
                mode.editable(),
                escape_html(&c.text)
            ),
            BlockContent::Image(c) => image(c, id, mode),
            BlockContent::Button(c) => button(c),
            BlockContent::Divider(_) => {
                "<hr class=\"border-slate-200 dark:border-slate-700 my-4\">".to_string()
            }
            BlockContent::Spacer(c) => format!("<div style=\"height: {}px\"></div>", c.height),
            BlockContent::Quote(c) => quote(c, mode),
            BlockContent::Callout(c) => callout(c, mode),
            BlockContent::Video(c) => video(c, id, mode),
            BlockContent::List(c) => list(c),
            BlockContent::Section(c) => section(c, children),
            BlockContent::Columns(c) => columns(c, children),
            BlockContent::Collapsible(c) => collapsible(c, mode),
            BlockContent::Toc(c) => format!(
                "<nav class=\"p-4 bg-slate-50 dark:bg-slate-800 rounded-lg border border-slate-200 dark:border-slate-700\">\
<h4 class=\"font-bold text-slate-900 dark:text-white mb-3\">{}</h4>\
<ul class=\"space-y-2 text-sm text-primary\">\
<li><a href=\"#\" class=\"hover:underline\">• Section 1</a></li>\
<li><a href=\"#\" class=\"hover:underline\">• Section 2</a></li>\
<li><a href=\"#\" class=\"hover:underline\">• Section 3</a></li></ul></nav>",
                escape_html(&c.title)
            ),
            BlockContent::Placeholder(c) => format!(
                "<div class=\"p-8 border-2 border-dashed border-slate-300 dark:border-slate-600 rounded-lg flex items-center justify-center text-slate-400\">\
<span class=\"material-symbols-outlined mr-2\">add_box</span><span>{}</span></div>",
                escape_html(&c.text)
            ),
            BlockContent::Carousel(c) => carousel(c, id, mode),
            BlockContent::Youtube(c) => youtube(c, id, mode),
            BlockContent::Social(c) => social(c),
            BlockContent::Map(c) => map(c, id, mode),
            BlockContent::Calendar(c) => embed(c, id, mode, "aspect-video", "blue", "calendar_month", "Click to embed Google Calendar", false, "calendar"),
            BlockContent::Docs(c) => embed(c, id, mode, "aspect-[4/3]", "blue", "description", "Click to embed Google Doc", false, "docs"),
            BlockContent::Slides(c) => embed(c, id, mode, "aspect-video", "amber", "slideshow", "Click to embed Google Slides", true, "slides"),
            BlockContent::Sheets(c) => embed(c, id, mode, "aspect-[4/3]", "emerald", "table_chart", "Click to embed Google Sheet", false, "sheets"),
            BlockContent::Forms(c) => embed(c, id, mode, "aspect-[4/3]", "purple", "assignment", "Click to embed Google Form", false, "forms"),
            BlockContent::Charts(c) => embed(c, id, mode, "aspect-video", "indigo", "bar_chart", "Click to embed chart", false, "charts"),
            BlockContent::Code(c) => code(c),
        }
    }
}

fn heading(c: &HeadingContent, mode: RenderMode) -> String {
    let tag = c.level.tag();
    format!(
        "<{tag} class=\"text-2xl font-bold text-slate-900 dark:text-white\"{}>{}</{tag}>",
        mode.editable(),
        escape_html(&c.text)
    )
}

fn image(c: &ImageContent, id: &BlockId, mode: RenderMode) -> String {
    if c.src.is_empty() {
        return placeholder(
            id,
            mode,
            Placeholder {
                aspect: "aspect-video",
                color: "slate",
                icon: "add_photo_alternate",
                label: "Click to add image",
                action: "edit-image",
            },
        );
    }
    format!(
        "<figure><img src=\"{}\" alt=\"{}\" class=\"w-full rounded-lg\">\
<figcaption class=\"text-sm text-slate-500 text-center mt-2\">{}</figcaption></figure>",
        escape_html(&c.src),
        escape_html(&c.alt),
        escape_html(&c.caption)
    )
}

fn button(c: &ButtonContent) -> String {
    format!(
        "<div class=\"text-center py-2\"><a href=\"{}\" class=\"inline-block px-6 py-3 rounded-lg btn-{} font-semibold transition-colors\">{}</a></div>",
        escape_html(&c.url),
        escape_html(&c.style),
        escape_html(&c.text)
    )
}

fn quote(c: &QuoteContent, mode: RenderMode) -> String {
    let footer = if c.author.is_empty() {
        String::new()
    } else {
        format!(
            "<footer class=\"text-sm text-slate-500 mt-2 not-italic\">— {}</footer>",
            escape_html(&c.author)
        )
    };
    format!(
        "<blockquote class=\"border-l-4 border-primary pl-6 py-2 italic text-xl text-slate-700 dark:text-slate-300\">\
<p{}>{}</p>{footer}</blockquote>",
        mode.editable(),
        escape_html(&c.text)
    )
}

fn callout(c: &CalloutContent, mode: RenderMode) -> String {
    let color = c.kind.color();
    format!(
        "<div class=\"p-4 rounded-lg bg-{color}-50 dark:bg-{color}-900/20 border border-{color}-200 dark:border-{color}-800\">\
<p class=\"text-{color}-700 dark:text-{color}-400\"{}>{}</p></div>",
        mode.editable(),
        escape_html(&c.text)
    )
}

fn video(c: &VideoContent, id: &BlockId, mode: RenderMode) -> String {
    if c.url.is_empty() {
        return placeholder(
            id,
            mode,
            Placeholder {
                aspect: "aspect-video",
                color: "slate",
                icon: "videocam",
                label: "Click to add video URL",
                action: "edit-video",
            },
        );
    }
    frame("aspect-video", &c.url, true)
}

fn list(c: &ListContent) -> String {
    let (tag, style) = if c.ordered {
        ("ol", "decimal")
    } else {
        ("ul", "disc")
    };
    let items: String = c
        .items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!(
        "<{tag} class=\"list-{style} list-inside text-slate-700 dark:text-slate-300 space-y-1\">{items}</{tag}>"
    )
}

fn section(c: &SectionContent, children: &str) -> String {
    let background = if c.background == "transparent" {
        String::new()
    } else {
        format!(" bg-{}", escape_html(&c.background))
    };
    format!(
        "<section class=\"p-{} rounded-xl{background}\">{children}</section>",
        padding_scale(&c.padding)
    )
}

fn columns(c: &ColumnsContent, children: &str) -> String {
    format!(
        "<div class=\"grid grid-cols-{} gap-{}\">{children}</div>",
        c.count.max(1),
        padding_scale(&c.gap)
    )
}

/// Maps the `sm`/`md`/`lg` size names to Tailwind spacing steps.
fn padding_scale(size: &str) -> u8 {
    match size {
        "none" => 0,
        "sm" => 4,
        "lg" => 12,
        _ => 8,
    }
}

fn collapsible(c: &CollapsibleContent, mode: RenderMode) -> String {
    let open = if c.open { " open" } else { "" };
    format!(
        "<details class=\"border border-slate-200 dark:border-slate-700 rounded-lg overflow-hidden\"{open}>\
<summary class=\"p-4 bg-slate-50 dark:bg-slate-800 cursor-pointer font-medium text-slate-900 dark:text-white\">{}</summary>\
<div class=\"p-4 text-slate-700 dark:text-slate-300\"{}>{}</div></details>",
        escape_html(&c.title),
        mode.editable(),
        escape_html(&c.content)
    )
}

fn carousel(c: &CarouselContent, id: &BlockId, mode: RenderMode) -> String {
    match c.images.first() {
        Some(first) => format!(
            "<div class=\"relative overflow-hidden rounded-lg\"><img src=\"{}\" class=\"w-full aspect-video object-cover\"></div>",
            escape_html(first)
        ),
        None => placeholder(
            id,
            mode,
            Placeholder {
                aspect: "aspect-video",
                color: "slate",
                icon: "view_carousel",
                label: "Click to add images",
                action: "edit-carousel",
            },
        ),
    }
}

fn youtube(c: &YoutubeContent, id: &BlockId, mode: RenderMode) -> String {
    if c.video_id.is_empty() {
        return placeholder(
            id,
            mode,
            Placeholder {
                aspect: "aspect-video",
                color: "red",
                icon: "smart_display",
                label: "Click to add YouTube video",
                action: "edit-youtube",
            },
        );
    }
    frame(
        "aspect-video",
        &format!("https://www.youtube.com/embed/{}", c.video_id),
        true,
    )
}

fn social(c: &SocialContent) -> String {
    const NETWORKS: [(&str, &str, &str); 4] = [
        ("facebook", "bg-blue-600", "chat"),
        ("twitter", "bg-sky-500", "share"),
        ("linkedin", "bg-blue-700", "work"),
        ("instagram", "bg-gradient-to-r from-purple-500 to-pink-500", "photo_camera"),
    ];

    let links: String = NETWORKS
        .iter()
        .map(|(network, background, icon)| {
            let href = c
                .links
                .get(*network)
                .filter(|url| !url.is_empty())
                .map(|url| escape_html(url))
                .unwrap_or_else(|| "#".to_string());
            format!(
                "<a href=\"{href}\" class=\"size-10 rounded-full {background} flex items-center justify-center text-white\">\
<span class=\"material-symbols-outlined text-lg\">{icon}</span></a>"
            )
        })
        .collect();
    format!("<div class=\"flex items-center justify-center gap-4 py-4\">{links}</div>")
}

fn map(c: &MapContent, id: &BlockId, mode: RenderMode) -> String {
    if c.embed_url.is_empty() {
        return placeholder(
            id,
            mode,
            Placeholder {
                aspect: "aspect-video",
                color: "emerald",
                icon: "location_on",
                label: "Click to embed Google Map",
                action: "edit-embed-map",
            },
        );
    }
    frame("aspect-video", &c.embed_url, true)
}

#[allow(clippy::too_many_arguments)]
fn embed(
    c: &EmbedContent,
    id: &BlockId,
    mode: RenderMode,
    aspect: &str,
    color: &str,
    icon: &str,
    label: &str,
    fullscreen: bool,
    kind: &str,
) -> String {
    if c.embed_url.is_empty() {
        let action = format!("edit-embed-{kind}");
        return placeholder(
            id,
            mode,
            Placeholder {
                aspect,
                color,
                icon,
                label,
                action: &action,
            },
        );
    }
    frame(aspect, &c.embed_url, fullscreen)
}

fn code(c: &CodeContent) -> String {
    format!(
        "<pre class=\"p-4 bg-slate-900 rounded-lg overflow-x-auto\"><code class=\"text-sm text-emerald-400 font-mono language-{}\">{}</code></pre>",
        escape_html(&c.language),
        escape_html(&c.code)
    )
}
