//! Path utilities for scene assets.
//!
//! Scene images are found by a `scene<N>_` file name prefix inside the images
//! directory, and each scene's narration defaults to `s<N>.mp3` inside the audio
//! directory. Everything the pipeline writes has a fixed name derived from the
//! scene number, so re-runs overwrite instead of accumulating files.
//!
//! Extension checks keep stray files such as notes and partial downloads out
//! of the image sequence.

use std::path::Path;

/// List of image file extensions accepted in a scene's image sequence.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff"];

/// List of audio file extensions accepted as narration.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "flac", "ogg", "opus"];

/// Check if a path has an image file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use scenereel_common::paths::is_image_file;
///
/// assert!(is_image_file(Path::new("scene1_1.png")));
/// assert!(is_image_file(Path::new("/path/to/scene2_3.JPG")));
/// assert!(!is_image_file(Path::new("scene1.txt")));
/// ```
pub fn is_image_file(path: &Path) -> bool {
    has_extension_in(path, IMAGE_EXTENSIONS)
}

/// Check if a path has an audio file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use scenereel_common::paths::is_audio_file;
///
/// assert!(is_audio_file(Path::new("s1.mp3")));
/// assert!(!is_audio_file(Path::new("scene1_1.png")));
/// ```
pub fn is_audio_file(path: &Path) -> bool {
    has_extension_in(path, AUDIO_EXTENSIONS)
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// File name prefix shared by every image of a scene.
///
/// # Examples
///
/// ```
/// use scenereel_common::paths::scene_image_prefix;
///
/// assert_eq!(scene_image_prefix(4), "scene4_");
/// ```
#[must_use]
pub fn scene_image_prefix(number: u32) -> String {
    format!("scene{number}_")
}

/// Check whether a file name belongs to the given scene's image sequence.
///
/// Matching is case-insensitive. The trailing underscore in the prefix keeps
/// scene 1 from claiming the images of scene 10, 11, and so on.
pub fn matches_scene_prefix(file_name: &str, number: u32) -> bool {
    file_name
        .to_lowercase()
        .starts_with(&scene_image_prefix(number))
}

/// Default narration file name for a scene.
///
/// # Examples
///
/// ```
/// use scenereel_common::paths::default_audio_name;
///
/// assert_eq!(default_audio_name(2), "s2.mp3");
/// ```
#[must_use]
pub fn default_audio_name(number: u32) -> String {
    format!("s{number}.mp3")
}

/// Scene number of a per-scene text file named `scene<N>.txt`.
///
/// # Examples
///
/// ```
/// use scenereel_common::paths::scene_text_number;
///
/// assert_eq!(scene_text_number("scene12.txt"), Some(12));
/// assert_eq!(scene_text_number("scene1_images.txt"), None);
/// ```
pub fn scene_text_number(file_name: &str) -> Option<u32> {
    let digits = file_name
        .to_lowercase()
        .strip_prefix("scene")?
        .strip_suffix(".txt")?
        .to_string();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Name of the ffconcat manifest written for a scene.
#[must_use]
pub fn scene_manifest_name(number: u32) -> String {
    format!("scene{number}_images.txt")
}

/// Name of the encoded clip of a scene.
#[must_use]
pub fn scene_clip_name(number: u32) -> String {
    format!("scene{number}_final.mp4")
}

/// Name of the clip list handed to the merge.
pub const MERGE_LIST_NAME: &str = "merge_list.txt";

/// Name of the merged video.
pub const FINAL_VIDEO_NAME: &str = "final_video.mp4";
