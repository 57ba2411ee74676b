use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use handpuppet::commands::CommandProcessor;
use handpuppet::config::Config;
use handpuppet::frame_loop::{FrameLoop, FrameTime};
use handpuppet::gesture::{classify, GestureLabel};
use handpuppet::landmarks::{DetectorFrame, Landmark, LandmarkSet, LANDMARK_COUNT};
use handpuppet::shared::SessionInputs;
use handpuppet::skeleton::SkeletonMap;

mod common;
use common::mock_sink::RecordingSink;

fn random_landmarks(rng: &mut StdRng, count: usize) -> Vec<Landmark> {
    (0..count)
        .map(|_| {
            Landmark::new(
                rng.gen_range(-0.5..1.5),
                rng.gen_range(-0.5..1.5),
                rng.gen_range(-1.0..1.0),
            )
        })
        .collect()
}

#[test]
fn test_classifier_total_on_random_frames() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..5_000 {
        let points = random_landmarks(&mut rng, LANDMARK_COUNT);
        let set = LandmarkSet::new(&points).unwrap();
        let label = classify(&set);
        assert_ne!(label, GestureLabel::None);
    }
}

#[test]
fn test_frame_loop_survives_garbage() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut frame_loop = FrameLoop::new(&Config::default(), SkeletonMap::empty(), SessionInputs::new());
    let mut sink = RecordingSink::new();

    for frame in 0..2_000u32 {
        let input = match rng.gen_range(0..6) {
            0 => DetectorFrame::NoHand,
            1 => {
                let count = rng.gen_range(0..40);
                DetectorFrame::Hand {
                    landmarks: random_landmarks(&mut rng, count),
                }
            }
            2 => DetectorFrame::Hand {
                landmarks: vec![Landmark::new(f32::NAN, 0.5, 0.0); LANDMARK_COUNT],
            },
            _ => DetectorFrame::Hand {
                landmarks: random_landmarks(&mut rng, LANDMARK_COUNT),
            },
        };
        frame_loop.inputs().detector.publish(input).unwrap();

        let delta = rng.gen_range(0.0..0.2);
        frame_loop.tick(FrameTime::from_secs(f64::from(frame) * 0.033, delta), &mut sink);

        let pose = frame_loop.pose();
        assert!(pose.position.is_finite(), "pose diverged at frame {}", frame);
        assert!(pose.scale.is_finite());
        assert!(frame_loop.controller().running_count() <= 1);
    }
}

#[test]
fn test_voice_flood() {
    let processor = CommandProcessor::new();

    // Simulate a flood of random garbage text
    let garbage = [
        "asdfghjkl",
        "!!! @@@ ###",
        "1234567890",
        "extremely long string that doesn't mean anything to the puppet at all and keeps going for a while",
        "",
        " ",
    ];

    for text in garbage {
        assert!(processor.process(text).is_none(), "matched garbage: {}", text);
    }

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1_000 {
        let len = rng.gen_range(0..64);
        let text: String = (0..len).map(|_| rng.gen_range(' '..='~')).collect();
        let _ = processor.process(&text);
    }

    // Stability check: processor should still be functional
    assert!(processor.process("dance").is_some());
}
