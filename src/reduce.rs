//! Greedy merge/split reduction of a color set to a fixed-size palette.
//!
//! The colors are first sorted by [`brightness`] (the plain sum of the four channels), brightest first.
//! Then, until exactly [`PALETTE_LEN`] colors remain, one of two phases runs:
//! - Merge: while there are too many colors, the adjacent pair with the smallest difference in brightness
//!   is found and its darker member is removed.
//! - Split: while there are too few colors, the adjacent pair with the largest difference in brightness
//!   is found and the per-channel midpoint of the pair is inserted between them.
//!
//! Ties are always resolved in favor of the pair closest to the start (the brightest end) of the sequence.
//! Colors with equal brightness are ordered by their `(R, G, B, A)` components, descending,
//! so the result depends only on the set of input colors and never on their input order.
//!
//! A color set with exactly one color produces a palette of that color repeated.

use crate::{brightness, types::components, ColorSet, EmptyColorSet, Palette, PALETTE_LEN};
use palette::{cast, Srgba};
use std::cmp::Reverse;

/// Computes the palette for the given color set.
///
/// # Errors
/// Returns [`EmptyColorSet`] if `colors` is empty.
///
/// # Examples
/// ```
/// # use trim_palette::{reduce, ColorSet};
/// # use palette::Srgba;
/// # fn main() -> Result<(), trim_palette::EmptyColorSet> {
/// let colors = ColorSet::new(&[Srgba::new(255, 255, 255, 255), Srgba::new(0, 0, 0, 255)]);
/// let palette = reduce::palette(&colors)?;
/// assert_eq!(palette[0], Srgba::new(255, 255, 255, 255));
/// assert_eq!(palette[7], Srgba::new(0, 0, 0, 255));
/// # Ok(())
/// # }
/// ```
pub fn palette(colors: &ColorSet) -> Result<Palette, EmptyColorSet> {
    palette_from_slice(colors)
}

/// Computes the palette for a slice of colors that are assumed to be unique.
///
/// Duplicate colors are not removed beforehand.
/// Use [`palette`] with a [`ColorSet`] to reduce the colors of a texture.
///
/// # Errors
/// Returns [`EmptyColorSet`] if `colors` is empty.
pub fn palette_from_slice(colors: &[Srgba<u8>]) -> Result<Palette, EmptyColorSet> {
    let mut seq = sorted_by_brightness(colors);

    match seq.len() {
        0 => return Err(EmptyColorSet),
        1 => return Ok(Palette::new_unchecked([seq[0]; PALETTE_LEN])),
        _ => {}
    }

    merge_down(&mut seq);
    split_up(&mut seq);

    debug_assert_eq!(seq.len(), PALETTE_LEN);
    let mut palette = [Srgba::new(0, 0, 0, 0); PALETTE_LEN];
    palette.copy_from_slice(&seq);
    Ok(Palette::new_unchecked(palette))
}

/// Sorts the colors by decreasing brightness, then by decreasing components.
fn sorted_by_brightness(colors: &[Srgba<u8>]) -> Vec<Srgba<u8>> {
    let mut seq = colors.to_vec();
    seq.sort_unstable_by_key(|&color| Reverse((brightness(color), components(color))));
    seq
}

/// The brightness difference between each color and its next darker neighbor.
///
/// This can be negative after a split, since flooring each channel of a midpoint
/// may leave it slightly darker than its darker parent.
fn gaps(seq: &[Srgba<u8>]) -> impl Iterator<Item = (usize, i32)> + '_ {
    seq.windows(2)
        .map(|pair| i32::from(brightness(pair[0])) - i32::from(brightness(pair[1])))
        .enumerate()
}

/// The index of the first adjacent pair with the smallest brightness difference.
fn closest_pair(seq: &[Srgba<u8>]) -> Option<usize> {
    // min_by_key returns the first minimum
    gaps(seq).min_by_key(|&(_, diff)| diff).map(|(i, _)| i)
}

/// The index of the first adjacent pair with the largest brightness difference.
fn widest_gap(seq: &[Srgba<u8>]) -> Option<usize> {
    // max_by_key returns the last maximum, so compare with the index reversed
    gaps(seq)
        .max_by_key(|&(i, diff)| (diff, Reverse(i)))
        .map(|(i, _)| i)
}

/// Removes the darker color of the closest pair until [`PALETTE_LEN`] colors remain.
///
/// Returns the number of colors removed.
fn merge_down(seq: &mut Vec<Srgba<u8>>) -> usize {
    let mut merges = 0;
    while seq.len() > PALETTE_LEN {
        let Some(i) = closest_pair(seq) else { break };
        seq.remove(i + 1);
        merges += 1;
    }
    merges
}

/// Inserts the midpoint of the widest gap until there are [`PALETTE_LEN`] colors.
///
/// `seq` must contain at least two colors.
/// Returns the number of colors inserted.
fn split_up(seq: &mut Vec<Srgba<u8>>) -> usize {
    let mut splits = 0;
    while seq.len() < PALETTE_LEN {
        let Some(i) = widest_gap(seq) else { break };
        seq.insert(i + 1, midpoint(seq[i], seq[i + 1]));
        splits += 1;
    }
    splits
}

/// The floor of the per-channel mean of two colors.
///
/// Each channel of the result lies between the corresponding channels of `a` and `b`.
fn midpoint(a: Srgba<u8>, b: Srgba<u8>) -> Srgba<u8> {
    let a = components(a);
    let b = components(b);
    #[allow(clippy::cast_possible_truncation)]
    let mid = std::array::from_fn(|c| ((u16::from(a[c]) + u16::from(b[c])) / 2) as u8);
    cast::from_array::<Srgba<u8>>(mid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use rand::{seq::SliceRandom, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn gray(v: u8) -> Srgba<u8> {
        Srgba::new(v, v, v, 255)
    }

    fn is_sorted_by_brightness(colors: &[Srgba<u8>]) -> bool {
        colors
            .windows(2)
            .all(|pair| brightness(pair[0]) >= brightness(pair[1]))
    }

    #[test]
    fn empty_input() {
        let colors = ColorSet::default();
        assert_eq!(palette(&colors), Err(EmptyColorSet));
        assert_eq!(palette_from_slice(&[]), Err(EmptyColorSet));
    }

    #[test]
    fn single_color_repeated() {
        let color = Srgba::new(12, 200, 7, 99);
        let colors = ColorSet::new(&[color, color, Srgba::new(1, 1, 1, 0)]);
        let actual = palette(&colors).unwrap();
        assert_eq!(actual.into_inner(), [color; PALETTE_LEN]);
    }

    #[test]
    fn exact_size_is_sorted_input() {
        let colors = test_data_1024();
        for chunk in colors.chunks_exact(PALETTE_LEN).take(32) {
            let set = ColorSet::new(chunk);
            if set.len() != PALETTE_LEN {
                continue;
            }

            let actual = palette(&set).unwrap();
            assert_eq!(actual.as_ref(), sorted_by_brightness(&set).as_slice());
            assert!(is_sorted_by_brightness(&actual));

            let mut sorted_input = set.to_vec();
            sorted_input.sort_unstable_by_key(|&c| components(c));
            let mut sorted_output = actual.to_vec();
            sorted_output.sort_unstable_by_key(|&c| components(c));
            assert_eq!(sorted_input, sorted_output);
        }
    }

    #[test]
    fn merge_only_removes() {
        let colors = ColorSet::new(&test_data_1024());
        assert!(colors.len() > PALETTE_LEN);

        let actual = palette(&colors).unwrap();
        assert_eq!(actual.len(), PALETTE_LEN);
        assert!(actual.iter().all(|c| colors.contains(c)));
        assert!(is_sorted_by_brightness(&actual));

        let mut unique = actual.to_vec();
        unique.sort_unstable_by_key(|&c| components(c));
        unique.dedup();
        assert_eq!(unique.len(), PALETTE_LEN);
    }

    #[test]
    fn merge_keeps_brightest() {
        // the closest pair is always merged into its brighter member,
        // so the brightest color of the whole sequence can never be removed
        let colors = ColorSet::new(&test_data_1024());
        let seq = sorted_by_brightness(&colors);
        let actual = palette(&colors).unwrap();
        assert_eq!(actual[0], seq[0]);
    }

    #[test]
    fn closest_pair_merged_first() {
        let mut colors = (0..9u8).map(|i| gray(i * 25)).collect::<Vec<_>>();
        let near = Srgba::new(101, 100, 100, 255);
        colors.push(near);
        let set = ColorSet::new(&colors);
        assert_eq!(set.len(), 10);

        let mut seq = sorted_by_brightness(&set);
        let i = closest_pair(&seq).unwrap();
        assert_eq!(seq[i], near);
        assert_eq!(seq[i + 1], gray(100));

        seq.remove(i + 1);
        assert!(seq.contains(&near));
        assert!(!seq.contains(&gray(100)));

        let actual = palette(&set).unwrap();
        assert!(!actual.contains(&gray(100)));
    }

    #[test]
    fn merge_tie_takes_first_pair() {
        // all gaps start out equal, so the first merge removes the second color
        let colors = (0..10u8).map(|i| gray(i * 10)).collect::<Vec<_>>();
        let actual = palette(&ColorSet::new(&colors)).unwrap();
        let expected = [90, 70, 50, 40, 30, 20, 10, 0].map(gray);
        assert_eq!(actual.into_inner(), expected);
    }

    #[test]
    fn black_and_white_ramp() {
        let colors = ColorSet::new(&[gray(255), gray(0)]);
        let mut seq = sorted_by_brightness(&colors);

        assert_eq!(widest_gap(&seq), Some(0));
        assert_eq!(gaps(&seq).next(), Some((0, 1020 - 255)));

        seq.insert(1, midpoint(seq[0], seq[1]));
        assert_eq!(seq, [gray(255), gray(127), gray(0)]);

        let expected = [255, 223, 191, 159, 127, 95, 63, 0].map(gray);
        let actual = palette(&colors).unwrap();
        assert_eq!(actual.into_inner(), expected);
        assert!(is_sorted_by_brightness(&actual));
    }

    #[test]
    fn split_stays_within_parents() {
        let colors = test_data_1024();
        for n in 2..PALETTE_LEN {
            let set = ColorSet::new(&colors[(n * 13)..(n * 13 + n)]);
            assert_eq!(set.len(), n);

            let mut seq = sorted_by_brightness(&set);
            while seq.len() < PALETTE_LEN {
                let i = widest_gap(&seq).unwrap();
                let (a, b) = (components(seq[i]), components(seq[i + 1]));
                let mid = midpoint(seq[i], seq[i + 1]);
                for (c, m) in components(mid).into_iter().enumerate() {
                    assert!(a[c].min(b[c]) <= m && m <= a[c].max(b[c]));
                }
                seq.insert(i + 1, mid);
            }

            let actual = palette(&set).unwrap();
            assert_eq!(actual.as_ref(), seq.as_slice());
            assert!(set.iter().all(|c| actual.contains(c)));
        }
    }

    #[test]
    fn midpoint_is_symmetric() {
        let colors = test_data_1024();
        for pair in colors.windows(2) {
            assert_eq!(midpoint(pair[0], pair[1]), midpoint(pair[1], pair[0]));
        }
        assert_eq!(
            midpoint(Srgba::new(255, 0, 1, 3), Srgba::new(0, 255, 2, 0)),
            Srgba::new(127, 127, 1, 1),
        );
    }

    #[test]
    fn split_handles_negative_gap() {
        // the midpoint of these two is darker than both parents
        let bright = Srgba::new(1, 1, 1, 1);
        let dark = Srgba::new(0, 0, 0, 3);
        let mid = midpoint(bright, dark);
        assert_eq!(mid, Srgba::new(0, 0, 0, 2));
        assert!(brightness(mid) < brightness(dark));

        let actual = palette(&ColorSet::new(&[bright, dark])).unwrap();
        assert_eq!(actual.len(), PALETTE_LEN);
        assert_eq!(actual[0], bright);
    }

    #[test]
    fn exact_iteration_counts() {
        let colors = ColorSet::new(&test_data_1024());
        for n in [2, 3, 7, 8, 9, 16, 100, colors.len()] {
            let mut seq = sorted_by_brightness(&colors[..n]);
            let merges = merge_down(&mut seq);
            let splits = split_up(&mut seq);
            assert_eq!(seq.len(), PALETTE_LEN);
            assert_eq!(merges, n.saturating_sub(PALETTE_LEN));
            assert_eq!(splits, PALETTE_LEN.saturating_sub(n));
            assert!(merges == 0 || splits == 0);
        }
    }

    #[test]
    fn reordered_input() {
        let colors = test_data_1024();
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);

        for n in [2, 5, 8, 9, 64, colors.len()] {
            let expected = palette_from_slice(&colors[..n]).unwrap();
            let mut reordered = colors[..n].to_vec();
            for _ in 0..4 {
                reordered.shuffle(&mut rng);
                assert_eq!(palette_from_slice(&reordered).unwrap(), expected);
                assert_eq!(palette(&ColorSet::new(&reordered)).unwrap(), expected);
            }
        }
    }

    #[test]
    fn equal_brightness_ordered_by_components() {
        let colors = [
            Srgba::new(0, 10, 0, 255),
            Srgba::new(10, 0, 0, 255),
            Srgba::new(0, 0, 10, 255),
        ];
        let seq = sorted_by_brightness(&colors);
        assert_eq!(seq, [colors[1], colors[0], colors[2]]);
    }
}
