//! Numeric helpers shared by the chart builders and the summary table.
//!
//! Conventions follow NumPy/SciPy defaults: linear quantile interpolation,
//! sample standard deviation (ddof = 1), Scott's rule for KDE bandwidth and
//! the "auto" histogram bin width.

/// Largest number of histogram bins the "auto" rule may produce.
pub const MAX_BINS: usize = 200;

pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation; undefined below two observations.
pub fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (xs.len() - 1) as f64).sqrt())
}

/// Quantile of an ascending slice with linear interpolation between ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn sorted(xs: &[f64]) -> Vec<f64> {
    let mut out = xs.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Kernel bandwidth by Scott's rule, `None` for degenerate samples.
pub fn scott_bandwidth(xs: &[f64]) -> Option<f64> {
    let std = sample_std(xs)?;
    if std <= 0.0 {
        return None;
    }
    Some(std * (xs.len() as f64).powf(-0.2))
}

/// `n` evenly spaced points from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
            out[n - 1] = hi;
            out
        }
    }
}

/// Gaussian kernel density estimate of `xs` evaluated on `grid`.
pub fn gaussian_kde(xs: &[f64], bandwidth: f64, grid: &[f64]) -> Vec<f64> {
    let norm = 1.0 / (xs.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|&g| {
            let sum: f64 = xs
                .iter()
                .map(|&x| {
                    let z = (g - x) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * norm
        })
        .collect()
}

/// Density curve of `xs` as `[x, density]` points, extending `cut`
/// bandwidths past the data range. Empty when the sample is degenerate.
pub fn density_curve(xs: &[f64], cut: f64, grid_size: usize) -> Vec<[f64; 2]> {
    let Some(bw) = scott_bandwidth(xs) else {
        return Vec::new();
    };
    let (min, max) = min_max(xs);
    let grid = linspace(min - cut * bw, max + cut * bw, grid_size);
    let density = gaussian_kde(xs, bw, &grid);
    grid.into_iter().zip(density).map(|(x, d)| [x, d]).collect()
}

pub fn min_max(xs: &[f64]) -> (f64, f64) {
    xs.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    })
}

/// Bin edges by NumPy's "auto" rule: the smaller of the Freedman-Diaconis and
/// Sturges widths, Sturges alone when the IQR is zero.
pub fn auto_bin_edges(sorted: &[f64]) -> Vec<f64> {
    let Some((&min, &max)) = sorted.first().zip(sorted.last()) else {
        return Vec::new();
    };
    if max - min <= 0.0 {
        return vec![min - 0.5, min + 0.5];
    }

    let n = sorted.len() as f64;
    let range = max - min;
    let sturges = range / (n.log2() + 1.0);
    let iqr = quantile(sorted, 0.75).unwrap_or(max) - quantile(sorted, 0.25).unwrap_or(min);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    let bins = ((range / width).ceil() as usize).clamp(1, MAX_BINS);
    linspace(min, max, bins + 1)
}

/// Count values per bin; the last bin is closed on the right.
pub fn bin_counts(xs: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let bins = edges.len() - 1;
    let mut counts = vec![0usize; bins];
    for &x in xs {
        if x < edges[0] || x > edges[bins] {
            continue;
        }
        let idx = edges[1..].partition_point(|&e| e <= x).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate_linearly() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&xs, 0.25), Some(1.75));
        assert_eq!(quantile(&xs, 0.5), Some(2.5));
        assert_eq!(quantile(&xs, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn std_uses_sample_denominator() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138089935).abs() < 1e-6);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn kde_integrates_to_one() {
        let xs = [1.0, 2.0, 2.5, 4.0, 6.0];
        let curve = density_curve(&xs, 3.0, 400);
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum();
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
    }

    #[test]
    fn constant_sample_has_no_density() {
        assert!(density_curve(&[3.0, 3.0, 3.0], 3.0, 50).is_empty());
    }

    #[test]
    fn every_value_lands_in_a_bin() {
        let xs = sorted(&[0.0, 1.0, 1.5, 2.0, 3.0, 7.0, 10.0]);
        let edges = auto_bin_edges(&xs);
        let counts = bin_counts(&xs, &edges);
        assert_eq!(counts.iter().sum::<usize>(), xs.len());
        assert_eq!(edges.first(), Some(&0.0));
        assert_eq!(edges.last(), Some(&10.0));
    }

    #[test]
    fn constant_sample_gets_one_unit_bin() {
        let edges = auto_bin_edges(&[4.0, 4.0]);
        assert_eq!(edges, vec![3.5, 4.5]);
        assert_eq!(bin_counts(&[4.0, 4.0], &edges), vec![2]);
    }
}
