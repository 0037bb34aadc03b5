use std::path::Path;
use std::process::ExitCode;

use asset::{FileSource, SceneAssetParser};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <asset.glb> [min-buffer-views]", args[0]);
        return ExitCode::FAILURE;
    }

    let input_path = Path::new(&args[1]);
    let mut parser = SceneAssetParser::default();
    if let Some(min) = args.get(2) {
        match min.parse() {
            Ok(min) => parser = parser.min_buffer_views(min),
            Err(e) => {
                eprintln!("invalid buffer view count '{min}': {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let model = match pollster::block_on(asset::load(&FileSource::new(input_path), &parser)) {
        Ok(model) => model,
        Err(e) => {
            log::error!("{}: {e}", input_path.display());
            return ExitCode::FAILURE;
        }
    };

    for (name, record) in model.iter() {
        let attributes: Vec<String> = record.attributes.iter()
            .map(|(semantic, a)| format!("{semantic}:{:?}x{}",
                                         a.data.component_type(), a.components))
            .collect();
        let indices = match &record.indices {
            Some(ib) => format!("{:?}", ib.index_type),
            None => "none".to_string(),
        };
        let texture = match &record.texture {
            Some(image) => format!("{}x{}", image.width, image.height),
            None => "none".to_string(),
        };

        log::info!("{name}: {} vertices, indices {indices}, texture {texture}, [{}]",
                   record.vertex_count, attributes.join(" "));
        log::debug!("{name} transform:\n{:.3}", record.transform);
    }

    log::info!("{} primitives", model.len());
    ExitCode::SUCCESS
}
