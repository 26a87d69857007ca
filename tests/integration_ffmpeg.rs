//! Real ffmpeg runs.
//!
//! These generate tiny test images and tones with ffmpeg's lavfi sources, so
//! they are skipped when ffmpeg or ffprobe is not on PATH.

use scenereel::pipeline::{AssemblerOptions, PipelineError, SceneAssembler};
use scenereel::service::{FfmpegService, MediaService};
use scenereel_av::{EncodeSettings, ToolOverrides, ToolRegistry};
use scenereel_common::SceneList;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

fn tools() -> Option<ToolRegistry> {
    let registry = ToolRegistry::discover(&ToolOverrides::default());
    if registry.ffmpeg().is_err() || registry.ffprobe().is_err() {
        eprintln!("ffmpeg/ffprobe not found, skipping");
        return None;
    }
    Some(registry)
}

fn lavfi(ffmpeg: &Path, source: &str, extra: &[&str], output: &Path) {
    let status = Command::new(ffmpeg)
        .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i", source])
        .args(extra)
        .arg(output)
        .status()
        .unwrap();
    assert!(status.success(), "lavfi {source} failed");
}

fn fast_service(tools: ToolRegistry) -> FfmpegService {
    let settings = EncodeSettings {
        width: 320,
        height: 240,
        preset: "ultrafast".to_string(),
        ..Default::default()
    };
    FfmpegService::new(
        tools,
        settings,
        Duration::from_secs(30),
        Duration::from_secs(120),
    )
}

#[tokio::test]
async fn probe_reports_tone_duration() {
    let Some(tools) = tools() else { return };
    let dir = tempfile::tempdir().unwrap();
    let tone = dir.path().join("tone.wav");
    lavfi(tools.ffmpeg().unwrap(), "sine=frequency=440:duration=1.5", &[], &tone);

    let secs = fast_service(tools).probe(&tone).await.unwrap();
    assert!((secs - 1.5).abs() < 0.05, "got {secs}");
}

#[tokio::test]
async fn assembles_two_scenes() {
    let Some(tools) = tools() else { return };
    let ffmpeg = tools.ffmpeg().unwrap().to_path_buf();

    let root = tempfile::tempdir().unwrap();
    let images = root.path().join("images");
    let audio = root.path().join("audio");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::create_dir_all(&audio).unwrap();

    for (scene, colors) in [(1, ["red", "green"]), (2, ["blue", "white"])] {
        for (i, color) in colors.iter().enumerate() {
            lavfi(
                &ffmpeg,
                &format!("color=c={color}:s=160x90"),
                &["-frames:v", "1"],
                &images.join(format!("scene{scene}_{i}.png")),
            );
        }
        lavfi(
            &ffmpeg,
            "sine=frequency=330:duration=1",
            &[],
            &audio.join(format!("s{scene}.wav")),
        );
    }

    let list = SceneList::from_json(
        r#"[
            {"scene_number": 2, "audio": "s2.wav"},
            {"scene_number": 1, "audio": "s1.wav"},
            {"scene_number": 3, "audio": "s3.wav"}
        ]"#,
    )
    .unwrap();

    let options = AssemblerOptions {
        images_dir: images,
        audio_dir: audio,
        output_dir: root.path().join("outputs"),
        image_duration_secs: 1.0,
        max_parallel_scenes: 2,
    };
    let service = Arc::new(fast_service(tools));
    let report = SceneAssembler::new(service.clone(), options)
        .run(&list)
        .await
        .unwrap();

    assert_eq!(report.final_video.scenes, vec![1, 2]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].number, 3);

    // Two images at one second each, narration looped twice: two seconds per
    // scene.
    let final_secs = service.probe(&report.final_video.path).await.unwrap();
    assert!((final_secs - 4.0).abs() < 0.5, "got {final_secs}");

    let outputs = root.path().join("outputs");
    assert!(outputs.join("scene1_final.mp4").is_file());
    assert!(outputs.join("merge_list.txt").is_file());
    let leftovers: Vec<_> = std::fs::read_dir(&outputs)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".scenereel-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn encode_failures_end_in_no_clips() {
    let Some(tools) = tools() else { return };
    let root = tempfile::tempdir().unwrap();
    let images = root.path().join("images");
    let audio = root.path().join("audio");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::create_dir_all(&audio).unwrap();

    // Files with the right names but no decodable content.
    std::fs::write(images.join("scene1_1.png"), b"not an image").unwrap();
    std::fs::write(audio.join("s1.mp3"), b"not audio").unwrap();

    let options = AssemblerOptions {
        images_dir: images,
        audio_dir: audio,
        output_dir: root.path().join("outputs"),
        image_duration_secs: 1.0,
        max_parallel_scenes: 1,
    };
    let err = SceneAssembler::new(Arc::new(fast_service(tools)), options)
        .run(&SceneList::from_json(r#"[{"scene_number": 1}]"#).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::NoClips { .. }));
    assert!(!root.path().join("outputs/final_video.mp4").exists());
}
