/// Indices of local maxima, strict rise followed by strict fall.
///
/// Flat peaks are reported once, at the middle of the plateau (rounded down).
/// The first and last samples are never peaks.
pub fn find_peaks(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                let right = ahead - 1;
                peaks.push((i + right) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}
