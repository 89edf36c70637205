//! Deterministic placeholder icons derived from an operator type tag.
//!
//! The tag is hashed (Java `String#hashCode` over UTF-16 code units), the low
//! 24 bits pick a colour, and the icon is a 64×64 SVG swatch in that colour.

use base64::{engine::general_purpose::STANDARD, Engine as _};

const ICON_SIZE: u32 = 64;

fn string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// `#RRGGBB` colour for `tag`.
pub fn icon_color(tag: &str) -> String {
    format!("#{:06X}", string_hash(tag) & 0x00FF_FFFF)
}

/// `data:` URL of the icon for `tag`.
pub fn icon_url(tag: &str) -> String {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}"><rect width="{size}" height="{size}" fill="{color}"/></svg>"#,
        size = ICON_SIZE,
        color = icon_color(tag),
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}
