use std::collections::HashSet;

use crate::EmbeddedLink;

/// Number of link/title slots embedded into every article.
pub const EMBED_SLOTS: usize = 4;

/// Rotation modulus shared by every article of a job.
pub fn max_pairs(link_pool: &[String], title_pool: &[String]) -> usize {
    link_pool.len().max(title_pool.len()).max(1)
}

/// Starting offset into the pools for the article at `index` (0-based).
/// Advances by [`EMBED_SLOTS`] per article.
pub fn pair_pointer(index: usize, max_pairs: usize) -> usize {
    (index % max_pairs.max(1)) * EMBED_SLOTS % max_pairs.max(1)
}

/// Walks the pools from `pair_pointer`, avoiding repeated titles within the
/// returned slots when the pools allow it.
///
/// When a candidate's title is already taken, the next positions (wrapping
/// modulo `max_pairs`) are scanned for an unused title. If none exists the
/// duplicate is kept. Empty pools yield no slots.
pub fn embedded_links(
    link_pool: &[String],
    title_pool: &[String],
    pair_pointer: usize,
    max_pairs: usize,
) -> Vec<EmbeddedLink> {
    let mut slots = Vec::with_capacity(EMBED_SLOTS);
    if link_pool.is_empty() && title_pool.is_empty() {
        return slots;
    }
    let max_pairs = max_pairs.max(1);
    let mut used_titles: HashSet<String> = HashSet::with_capacity(EMBED_SLOTS);

    for slot in 0..EMBED_SLOTS {
        let position = (pair_pointer + slot) % max_pairs;
        let mut chosen = candidate(link_pool, title_pool, position);
        if used_titles.contains(&chosen.title) {
            if let Some(unused) = (1..max_pairs)
                .map(|step| candidate(link_pool, title_pool, (position + step) % max_pairs))
                .find(|c| !used_titles.contains(&c.title))
            {
                chosen = unused;
            }
        }
        used_titles.insert(chosen.title.clone());
        slots.push(chosen);
    }
    slots
}

fn candidate(link_pool: &[String], title_pool: &[String], position: usize) -> EmbeddedLink {
    let title = if title_pool.is_empty() {
        format!("Title {}", position + 1)
    } else {
        title_pool[position % title_pool.len()].clone()
    };
    let link = if link_pool.is_empty() {
        "#".to_string()
    } else {
        link_pool[position % link_pool.len()].clone()
    };
    EmbeddedLink::new(title, link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_advances_by_slot_count() {
        assert_eq!(pair_pointer(0, 3), 0);
        assert_eq!(pair_pointer(1, 3), 1);
        assert_eq!(pair_pointer(2, 3), 2);
        assert_eq!(pair_pointer(3, 10), 2);
        assert_eq!(pair_pointer(5, 1), 0);
    }

    #[test]
    fn max_pairs_never_zero() {
        assert_eq!(max_pairs(&[], &[]), 1);
        assert_eq!(max_pairs(&["a".into()], &["x".into(), "y".into()]), 2);
    }
}
