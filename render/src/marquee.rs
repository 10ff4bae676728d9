//! Repetition of marquee strips.

use std::collections::BTreeSet;

use folio_model::LogoItem;

/// Below this many distinct logos the strip is repeated three times,
/// otherwise twice, so the scroll never shows a gap.
pub const SHORT_STRIP: usize = 8;

/// How many copies of the item list a strip of `distinct` different logos
/// needs.
#[must_use]
pub fn repeat_count(distinct: usize) -> usize {
    if distinct < SHORT_STRIP {
        3
    } else {
        2
    }
}

/// Number of different images among `items`. Items without an image render
/// nothing and are not counted.
#[must_use]
pub fn distinct_logos(items: &[LogoItem]) -> usize {
    items
        .iter()
        .map(|item| item.image_url.as_str())
        .filter(|url| !url.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}

/// The scrolled sequence: the items, in order, repeated [`repeat_count`]
/// times.
#[must_use]
pub fn sequence(items: &[LogoItem]) -> Vec<&LogoItem> {
    let copies = repeat_count(distinct_logos(items));
    (0..copies).flat_map(|_| items.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo(url: &str) -> LogoItem {
        LogoItem {
            image_url: url.to_string(),
            link: String::new(),
        }
    }

    #[test]
    fn short_strips_repeat_three_times() {
        assert_eq!(repeat_count(1), 3);
        assert_eq!(repeat_count(7), 3);
        assert_eq!(repeat_count(8), 2);
    }

    #[test]
    fn empty_strip_is_empty() {
        assert!(sequence(&[]).is_empty());
    }

    #[test]
    fn duplicates_and_blank_images_do_not_lengthen_the_strip() {
        let items: Vec<LogoItem> = ["a", "a", "b", "c", "d", "e", "f", "g", ""]
            .into_iter()
            .map(logo)
            .collect();
        assert_eq!(distinct_logos(&items), 7);
        let shown = sequence(&items);
        assert_eq!(shown.len(), items.len() * 3);
        assert_eq!(shown.iter().filter(|item| item.image_url == "b").count(), 3);
    }
}
