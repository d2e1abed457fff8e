//! Selection of the grammar variant that best explains the aligner output.

/// Number of positions where both sequences hold the same phone.
fn agreement<A: AsRef<str>, B: AsRef<str>>(variant: &[A], observed: &[B]) -> usize {
    variant
        .iter()
        .map(AsRef::<str>::as_ref)
        .zip(observed.iter().map(AsRef::<str>::as_ref))
        .filter(|(v, o)| v == o)
        .count()
}

/// Index of the variant with the most position-wise agreements.
///
/// Only variants of exactly the observed length are scored. On equal scores
/// the earliest variant wins. Returns `None` when no variant has the observed
/// length.
pub fn best_variant<A, B>(variants: &[Vec<A>], observed: &[B]) -> Option<usize>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    variants
        .iter()
        .enumerate()
        .filter(|(_, v)| v.len() == observed.len())
        .map(|(i, v)| (i, agreement(v, observed)))
        // A zero score still wins when it is the only length match; the
        // length gate alone decides whether a variant can be selected.
        .fold(None, |best, (i, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((i, score)),
        })
        .map(|(i, _)| i)
}
