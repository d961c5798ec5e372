use anyhow::Result;
use hop_analysis_core::SessionAnalysis;
use std::fmt::Write as _;
use std::io::Write;

pub fn write_json<W: Write>(analysis: &SessionAnalysis, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, analysis)?;
    Ok(())
}

/// Human readable overview of a session, one line per item.
pub fn summary(analysis: &SessionAnalysis) -> String {
    let mut out = String::new();
    let duration = analysis.time.last().copied().unwrap_or(0.0);
    let _ = writeln!(
        out,
        "{} samples over {:.3} s, {} channels",
        analysis.time.len(),
        duration,
        analysis.channels.len()
    );

    for channel in &analysis.channels {
        let _ = writeln!(out, "  {}: {}", channel.name, channel.diagnostics);
    }

    let intervals = analysis.airborne_intervals();
    if intervals.is_empty() {
        let _ = writeln!(out, "no airborne samples");
    }
    for (start, end) in intervals {
        let _ = writeln!(
            out,
            "airborne {:.3} s .. {:.3} s ({} samples)",
            analysis.time[start],
            analysis.time[end - 1],
            end - start
        );
    }

    for (i, marker) in analysis.phase_markers.iter().enumerate() {
        let _ = writeln!(
            out,
            "phase marker {}: t = {:.3} s, relative pitch {:.2}°",
            i + 1,
            marker.time,
            marker.angle
        );
    }
    out
}
