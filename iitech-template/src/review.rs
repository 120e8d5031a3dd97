//! Offline link review
//!
//!     A pass over every `<a href>` that leaves the page: an absolute `http(s)` URL, optionally
//!     behind the mailing service's `##TrackClick##` prefix, or a bare `##...##` merge field.
//!     Each such link is made to open in a new window, a link wrapped by the enewsletterpro
//!     click tracker is pointed back at the destination it carries in its `url` parameter, and
//!     a link whose whole target is the `##TRACKCLICK##` placeholder is removed along with its
//!     contents. Nothing is fetched; whether a destination is reachable is not checked here.

use crate::dom;
use markup5ever_rcdom::Handle;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::form_urlencoded;

static EXTERNAL_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:##TrackClick##)?https?://(?:[a-z0-9]+\.)?[a-z0-9]+\.[a-z0-9]+|##.+##$)")
        .unwrap()
});

static CLICK_TRACKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^http://www\.ismailiinsight\.org/enewsletterpro/(?:v|t)\.aspx\?.*url=(.+?)(?:&|$)")
        .unwrap()
});

const TRACKING_PLACEHOLDER: &str = "##TRACKCLICK##";

/// What a review changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewReport {
    /// Links that point off the page, removed ones included.
    pub external: usize,
    /// Links whose `target` was set to `_blank`.
    pub retargeted: usize,
    /// Tracker links rewritten to their destination.
    pub untracked: usize,
    /// Placeholder links removed from the page.
    pub removed: usize,
}

pub(crate) fn review_links(root: &Handle) -> ReviewReport {
    let mut report = ReviewReport::default();
    let links: Vec<_> = dom::descendants(root)
        .into_iter()
        .filter(|node| dom::is_element(node, "a"))
        .filter_map(|link| {
            let href = dom::attribute(&link, "href")?;
            EXTERNAL_LINK.is_match(&href).then_some((link, href))
        })
        .collect();

    for (link, href) in links {
        report.external += 1;

        if href == TRACKING_PLACEHOLDER {
            tracing::debug!("removing tracking placeholder link");
            dom::detach(&link);
            report.removed += 1;
            continue;
        }

        let opens_new_window = dom::attribute(&link, "target")
            .is_some_and(|target| target.eq_ignore_ascii_case("_blank"));
        if !opens_new_window {
            dom::set_attribute(&link, "target", "_blank");
            report.retargeted += 1;
        }

        if let Some(destination) = tracked_destination(&href) {
            tracing::debug!(%href, %destination, "unwrapping click tracker");
            dom::set_attribute(&link, "href", &destination);
            report.untracked += 1;
        }
    }
    report
}

/// The decoded `url` parameter of a click-tracker link.
fn tracked_destination(href: &str) -> Option<String> {
    let encoded = CLICK_TRACKER.captures(href)?.get(1)?.as_str();
    form_urlencoded::parse(format!("url={}", encoded).as_bytes())
        .next()
        .map(|(_, destination)| destination.into_owned())
}
