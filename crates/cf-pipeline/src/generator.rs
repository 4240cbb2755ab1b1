//! # Synthetic short generation
//!
//! Pure fabrication: nothing here looks at video content. The shape of the
//! output (how many shorts, their titles) depends only on the file name and
//! size; everything else is drawn from the supplied random source.

use cf_core::format::display_stem;
use cf_core::models::{Short, ShortStatus, VideoFile};
use rand::seq::SliceRandom;
use rand::Rng;

/// Stock clip every generated short points at until real rendering exists.
pub const STOCK_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

pub const MIN_SHORTS: usize = 3;
pub const MAX_SHORTS: usize = 5;

pub const HASHTAG_POOL: [&str; 16] = [
    "#viral",
    "#trending",
    "#shorts",
    "#fyp",
    "#foryou",
    "#viralvideo",
    "#trendingnow",
    "#mustwatch",
    "#amazing",
    "#incredible",
    "#mindblowing",
    "#viralcontent",
    "#trendingvideo",
    "#shortsfeed",
    "#fypシ",
    "#foryoupage",
];

const CAPTION_COUNT: usize = 8;

fn caption_template(choice: usize, name: &str, index: usize) -> String {
    match choice {
        0 => format!("🎬 The most epic moment from {name}! You won't believe what happens next..."),
        1 => format!("🔥 This {name} clip is absolutely insane! Drop a ❤️ if you agree!"),
        2 => format!("⚡️ The highlight of {name} - pure magic captured in {index} seconds!"),
        3 => format!("🎯 This {name} moment changed everything! What do you think?"),
        4 => format!("🚀 From {name} - this is what peak performance looks like!"),
        5 => format!("💫 The best part of {name} - pure gold! 🔥"),
        6 => format!("🎪 {name} never disappoints! This clip proves it!"),
        _ => format!("🌟 {name} magic in action! Can't stop watching!"),
    }
}

/// `clamp(floor(size_mib / 10), 3, 5)`
pub fn short_count(size_mib: f64) -> usize {
    ((size_mib / 10.0).floor() as usize).clamp(MIN_SHORTS, MAX_SHORTS)
}

pub fn caption<R: Rng + ?Sized>(name: &str, index: usize, rng: &mut R) -> String {
    caption_template(rng.gen_range(0..CAPTION_COUNT), name, index)
}

/// Between 5 and 9 distinct tags from `HASHTAG_POOL`.
pub fn hashtags<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let amount = rng.gen_range(5..10);
    HASHTAG_POOL
        .choose_multiple(rng, amount)
        .map(|tag| tag.to_string())
        .collect()
}

pub fn thumbnail_url(index: usize) -> String {
    format!("https://picsum.photos/300/400?random={index}")
}

#[derive(Debug, Clone)]
pub struct ShortGenerator {
    video_url: Option<String>,
}

impl Default for ShortGenerator {
    fn default() -> Self {
        Self::new(Some(STOCK_VIDEO_URL.to_string()))
    }
}

impl ShortGenerator {
    /// `video_url: None` produces shorts without a media reference.
    pub fn new(video_url: Option<String>) -> Self {
        Self { video_url }
    }

    pub fn generate<R: Rng + ?Sized>(&self, file: &VideoFile, rng: &mut R) -> Vec<Short> {
        let name = display_stem(&file.name);
        let count = short_count(file.size_mib());

        (1..=count)
            .map(|index| {
                let offset = (index as u32 - 1) * 30;
                let start_time = rng.gen_range(0..60) + offset;
                let duration = rng.gen_range(15..30);
                Short {
                    id: index as u32,
                    title: format!("{name} - Short {index}"),
                    start_time,
                    duration,
                    end_time: start_time + duration,
                    caption: caption(name, index, rng),
                    hashtags: hashtags(rng),
                    thumbnail: thumbnail_url(index),
                    video_url: self.video_url.clone(),
                    status: ShortStatus::Ready,
                }
            })
            .collect()
    }
}
