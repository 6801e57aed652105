/// Polyview Terminal - spinning OBJ model in the terminal
///
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - +/-: Spin faster / slower
///   - Space: Pause the spin, 0: Reset
///   - Q/ESC: Quit

use clap::Parser;
use polyview_core::Mesh;
use polyview_terminal::cli::{initialize_tracing, Cli};
use polyview_terminal::TerminalApp;
use std::fs;
use std::io;
use std::path::Path;

fn load_mesh(path: Option<&Path>) -> io::Result<Mesh> {
    let mesh = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                io::Error::new(e.kind(), format!("Failed to read {}: {}", path.display(), e))
            })?;
            Mesh::from_obj(&text)
        }
        None => Mesh::default_model(),
    };
    mesh.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load model: {}", e)))
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_filter, cli.log_format, cli.log_file.as_deref())?;

    let mesh = load_mesh(cli.model.as_deref()).map_err(|e| {
        tracing::error!("{e}");
        e
    })?;
    tracing::info!(
        model = ?cli.model,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "model loaded"
    );

    // Run the terminal app
    let mut app = TerminalApp::new(mesh, cli.app_config())?;
    app.run()
}
