use futures_util::{SinkExt, StreamExt};
use paf_base::Vec2;
use paf_pose::{
    standing_person, AssemblyConfig, BodyPart, FramePainter, PoseAssembler, PoseStream,
};
use std::env;

const HEIGHT: usize = 48;
const WIDTH: usize = 64;
const FRAMES: usize = 8;

/// Two people walking towards each other, one column per frame.
fn people_at(frame: usize) -> Vec<Vec<Option<Vec2<f32>>>> {
    let step = frame as f32;
    vec![
        standing_person(Vec2::new(3.0 + step, 4.0)),
        standing_person(Vec2::new(45.0 - step, 6.0)),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match env::var("PAF_LOG_DIR") {
        Ok(dir) => paf_base::init_file_logger(dir)?,
        Err(_) => paf_base::init_stdout_logger(),
    }

    let config = match env::var("PAF_CONFIG") {
        Ok(path) => {
            log::info!("loading assembly config from {}", path);
            AssemblyConfig::from_json_file(path)?
        }
        Err(_) => AssemblyConfig::default(),
    };

    let painter = FramePainter::new(HEIGHT, WIDTH);
    let mut stream = PoseStream::new(PoseAssembler::new(config)?);

    for frame in 0..FRAMES {
        stream.send(painter.paint(&people_at(frame))?).await?;
    }
    stream.close().await?;

    let mut frame = 0;
    while let Some(result) = stream.next().await {
        let poses = result?;
        log::info!("frame {}: {} people", frame, poses.len());
        for (person, skeleton) in poses.skeletons.iter().enumerate() {
            let keypoints = poses.keypoints(skeleton, WIDTH, HEIGHT);
            let found: Vec<String> = BodyPart::ALL
                .iter()
                .zip(&keypoints)
                .filter_map(|(part, p)| p.map(|p| format!("{}=({:.1},{:.1})", part.name(), p.x, p.y)))
                .collect();
            log::info!(
                "  person {}: {} parts, {} limbs: {}",
                person,
                skeleton.num_present(),
                poses.limbs(skeleton, WIDTH, HEIGHT).len(),
                found.join(" ")
            );
        }
        frame += 1;
    }

    Ok(())
}
