use anyhow::Result;

use scrollstage_core::{Engine, LayoutHost, Scene, StageConfig, Viewport};

use crate::SceneFormat;

pub fn show(scene: &Scene, format: SceneFormat) -> Result<()> {
    match format {
        SceneFormat::Toml => print!("{}", scene.to_toml()?),
        SceneFormat::Json => println!("{}", serde_json::to_string_pretty(scene)?),
    }
    Ok(())
}

/// Print every resolved trigger region and every scene entry the engine skipped
pub fn check(config: &StageConfig, scene: &Scene) -> Result<()> {
    let viewport = Viewport {
        width: config.viewport.width,
        height: config.viewport.height,
    };
    let mut layout = scene.layout(viewport);
    let engine = Engine::new(&config.scroll, scene, &mut layout);

    println!(
        "Viewport {}x{}, document {:.0}px, scroll limit {:.0}px\n",
        viewport.width,
        viewport.height,
        layout.document_height(),
        layout.scroll_limit()
    );

    println!("Triggers ({}):", engine.registry().len());
    for trigger in engine.registry().iter() {
        let region = trigger.region();
        let pin = if trigger.def().pin {
            format!(" pinned, reserves {:.0}px", trigger.pin_spacing())
        } else {
            String::new()
        };
        let degenerate = if region.is_degenerate() { " (step)" } else { "" };
        println!(
            "  {:<16} {:>8.0} -> {:<8.0}{}{}",
            trigger.name(),
            region.start,
            region.end,
            degenerate,
            pin
        );
    }

    let active: Vec<&str> = engine.cluster_ids().collect();
    println!("\nClusters ({}):", active.len());
    for cluster in &scene.clusters {
        if active.contains(&cluster.id.as_str()) {
            println!(
                "  {:<16} {} elements on {}",
                cluster.id, cluster.elements, cluster.trigger
            );
        } else {
            println!("  {:<16} SKIPPED", cluster.id);
        }
    }

    let skipped_triggers = scene.triggers.len() - engine.registry().len();
    if skipped_triggers > 0 || active.len() < scene.clusters.len() {
        anyhow::bail!(
            "{} trigger(s) and {} cluster(s) were skipped",
            skipped_triggers,
            scene.clusters.len() - active.len()
        );
    }
    Ok(())
}
