//! Terminal rendering for a channel report

use std::fmt::Write;

use crate::report::ChannelReport;

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn render_json(report: &ChannelReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn render_text(report: &ChannelReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_text(&mut out, report);
    out
}

fn write_text(out: &mut String, report: &ChannelReport) -> std::fmt::Result {
    let channel = &report.channel;
    writeln!(out, "Channel Information")?;
    writeln!(out, "  Title:       {}", channel.title)?;
    writeln!(out, "  URL:         {}", channel.url)?;
    writeln!(out, "  Subscribers: {}", group_thousands(channel.subscriber_count))?;
    writeln!(out, "  Total views: {}", group_thousands(channel.view_count))?;
    writeln!(out, "  Videos:      {}", group_thousands(channel.video_count))?;

    if !report.top_words.is_empty() {
        writeln!(out)?;
        writeln!(out, "Most Common Words in Video Titles")?;
        for (word, count) in &report.top_words {
            writeln!(out, "  {:<20} {}", word, count)?;
        }
    }

    if !report.top_videos.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top {} Videos by View Count", report.top_videos.len())?;
        for video in &report.top_videos {
            writeln!(out, "  {:>14}  {}", group_thousands(video.view_count), video.title)?;
        }
    }

    if let Some(stats) = &report.view_stats {
        writeln!(out)?;
        writeln!(out, "Distribution of Video Views")?;
        writeln!(
            out,
            "  min {}  median {:.0}  mean {:.0}  max {}",
            group_thousands(stats.min),
            stats.median,
            stats.mean,
            group_thousands(stats.max)
        )?;
    }

    if !report.videos.is_empty() {
        writeln!(out)?;
        writeln!(out, "Upload Frequency by Day of Week")?;
        for day in &report.upload_schedule {
            writeln!(out, "  {:<10} {:>4} {}", day.day, day.count, "#".repeat(day.count.min(60)))?;
        }
    }

    if let Some(forecast) = &report.forecast {
        writeln!(out)?;
        writeln!(out, "Future Predictions")?;
        if let Some(rates) = &report.growth_rates {
            writeln!(
                out,
                "  Monthly growth: subscribers {:.2}%, views {:.2}%",
                rates.subscribers * 100.0,
                rates.views * 100.0
            )?;
        }
        writeln!(
            out,
            "  {:<12} {:>10} {:>22} {:>22}",
            "Goal Date", "Time Until", "Subscribers Prediction", "Views Prediction"
        )?;
        for point in forecast {
            writeln!(
                out,
                "  {:<12} {:>10} {:>22} {:>22}",
                point.goal_date.format("%Y-%m-%d").to_string(),
                point.days_until,
                group_thousands(point.subscribers_prediction),
                group_thousands(point.views_prediction)
            )?;
        }
    }

    for warning in &report.warnings {
        writeln!(out)?;
        writeln!(out, "Warning: {}", warning)?;
    }

    Ok(())
}
