//! Video table analytics: top performers, view distribution, upload schedule

use chrono::{Datelike, Weekday};

use crate::analysis::types::{VideoRecord, ViewStats, WeekdayCount};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The `n` most viewed videos, highest first
pub fn top_videos(videos: &[VideoRecord], n: usize) -> Vec<VideoRecord> {
    let mut sorted = videos.to_vec();
    sorted.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    sorted.truncate(n);
    sorted
}

/// Min / median / mean / max views, or `None` without videos
pub fn view_stats(videos: &[VideoRecord]) -> Option<ViewStats> {
    if videos.is_empty() {
        return None;
    }

    let mut views: Vec<u64> = videos.iter().map(|video| video.view_count).collect();
    views.sort_unstable();

    let len = views.len();
    let median = if len % 2 == 0 {
        (views[len / 2 - 1] as f64 + views[len / 2] as f64) / 2.0
    } else {
        views[len / 2] as f64
    };
    let mean = views.iter().map(|&v| v as f64).sum::<f64>() / len as f64;

    Some(ViewStats {
        min: views[0],
        median,
        mean,
        max: views[len - 1],
    })
}

/// Uploads per day of the week, Monday through Sunday, zero-filled
pub fn upload_schedule(videos: &[VideoRecord]) -> Vec<WeekdayCount> {
    let mut counts = [0usize; 7];
    for video in videos {
        counts[video.published_at.weekday().num_days_from_monday() as usize] += 1;
    }

    WEEK.iter()
        .zip(counts)
        .map(|(day, count)| WeekdayCount {
            day: weekday_name(*day).to_string(),
            count,
        })
        .collect()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
