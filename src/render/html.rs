//! Markup for rendered links.

use crate::asset::{CONDITIONAL_CLOSE, Conditional, Variant};
use crate::utils::html::{comment_safe, escape_attr};

/// `<link>` or `<script>` tag for `url`, without trailing newline.
pub fn link(variant: &Variant, url: &str) -> String {
    match variant {
        Variant::Stylesheet { media } => format!(
            r#"<link href="{}" media="{}" rel="stylesheet" type="text/css" />"#,
            escape_attr(url),
            escape_attr(media)
        ),
        Variant::Script => format!(
            r#"<script src="{}" type="text/javascript"></script>"#,
            escape_attr(url)
        ),
    }
}

/// Append `markup` wrapped in the gate's conditional comment, if any.
pub fn push_gated(out: &mut String, conditional: &Conditional, markup: &str) {
    if conditional.is_conditional() {
        out.push_str(&conditional.open_tag());
        out.push('\n');
        out.push_str(markup);
        out.push('\n');
        out.push_str(CONDITIONAL_CLOSE);
        out.push('\n');
    } else {
        out.push_str(markup);
        out.push('\n');
    }
}

/// Provenance comment listing the source paths of a link.
pub fn push_debug_comment(out: &mut String, paths: &[String]) {
    out.push_str("<!-- Assets:\n");
    for path in paths {
        out.push_str(&comment_safe(path));
        out.push('\n');
    }
    out.push_str(" -->\n");
}
