use serde::{Serialize, Serializer};

/// Rendered as `...` between page links.
pub const ELLIPSIS: &str = "...";

/// Pages shown without elision.
const MAX_UNELIDED: u32 = 7;

/// One entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(n) => serializer.serialize_u32(*n),
            PageToken::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

impl core::fmt::Display for PageToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PageToken::Page(n) => write!(f, "{n}"),
            PageToken::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

/// Page links to show for `current_page` out of `total_pages`.
///
/// Up to seven pages are listed in full. Past that, the first and last pages
/// stay visible and the gap around the current page collapses to an ellipsis.
pub fn generate_pagination(current_page: u32, total_pages: u32) -> Vec<PageToken> {
    use PageToken::{Ellipsis, Page};

    if total_pages <= MAX_UNELIDED {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![Page(1), Page(2), Page(3), Ellipsis, Page(total_pages - 1), Page(total_pages)];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}
