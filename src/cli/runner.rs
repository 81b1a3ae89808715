use std::path::Path;

use clap::Parser;
use serde_json::json;

use crate::display::{ImageDisplay, SeedReport};
use crate::runtime::{AppContext, Result};
use crate::settings::{DisplaySettings, load_settings};

use super::types::{CatalogInfo, ChannelRow, Cli, Commands, ImageTypeArg};

pub fn run_cli() -> std::result::Result<(), String> {
    let cli = Cli::parse();
    let settings = match cli.settings.as_deref() {
        Some(path) => load_settings(path).map_err(|error| error.to_string())?,
        None => DisplaySettings::default(),
    };
    let app = AppContext::with_settings(settings);
    run(&app, cli.command).map_err(|error| error.to_string())
}

fn run(app: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Channels { input, image_type } => {
            let (display, seed) = open(app, &input, image_type)?;
            let info = CatalogInfo {
                source: input.display().to_string(),
                image_type: image_type.into(),
                channels: channel_rows(&display),
                seed,
            };
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Render {
            input,
            output,
            channels,
            image_type,
            state,
            save_state,
            saturation,
        } => {
            let (mut display, _) = open(app, &input, image_type)?;
            let service = app.display_service();
            if let Some(path) = state {
                service.load_state(&mut display, path)?;
            }
            if let Some(saturation) = saturation {
                display.auto_set_all(Some(saturation));
            }
            if !channels.is_empty() {
                service.select_by_name(&mut display, &channels)?;
            }
            let raster = service.render(&display)?;
            app.io_service().write(&output, &raster)?;
            if let Some(path) = save_state.as_ref() {
                service.save_state(&display, path)?;
            }
            let selected: Vec<String> = display
                .selected_channels()
                .map(|channel| channel.name().into_owned())
                .collect();
            println!(
                "{}",
                json!({"status": "ok", "output": output, "channels": selected})
            );
        }
        Commands::Value {
            input,
            x,
            y,
            channels,
            image_type,
        } => {
            let (mut display, _) = open(app, &input, image_type)?;
            let service = app.display_service();
            if !channels.is_empty() {
                service.select_by_name(&mut display, &channels)?;
            }
            println!("{}", service.value_at(&display, x, y)?);
        }
    }
    Ok(())
}

fn open(
    app: &AppContext,
    input: &Path,
    image_type: ImageTypeArg,
) -> Result<(ImageDisplay, Option<SeedReport>)> {
    let data = app.io_service().read(input, image_type.into())?;
    Ok(app.display_service().open(data))
}

fn channel_rows(display: &ImageDisplay) -> Vec<ChannelRow> {
    display
        .channels()
        .iter()
        .enumerate()
        .map(|(index, channel)| ChannelRow {
            index,
            name: channel.name().into_owned(),
            implementation_id: channel.implementation_id(),
            additive: channel.is_additive(),
            selected: display.is_selected(index),
            min_display: channel.min_display(),
            max_display: channel.max_display(),
            color: channel.color().map(|color| format!("#{color:06x}")),
        })
        .collect()
}
