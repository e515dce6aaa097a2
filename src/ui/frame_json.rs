use crate::terminal::{RenderFrame, TerminalSize};
use crate::ui::style::Color;

/// Snapshot of a rendered frame, used by `--dump-frame`.
pub fn frame_to_json(frame: &RenderFrame, size: TerminalSize) -> serde_json::Value {
    let cursor = frame.cursor.map(|c| {
        serde_json::json!({
            "row": c.row,
            "col": c.col,
        })
    });

    let layers = frame
        .layers
        .iter()
        .map(|layer| {
            let lines = layer
                .lines
                .iter()
                .map(|line| {
                    serde_json::Value::Array(
                        line.iter()
                            .map(|span| {
                                serde_json::json!({
                                    "text": span.text,
                                    "style": {
                                        "color": span.style.color.map(color_to_json),
                                        "background": span.style.background.map(color_to_json),
                                        "bold": span.style.bold,
                                        "dim": span.style.dim,
                                        "underline": span.style.underline,
                                    }
                                })
                            })
                            .collect(),
                    )
                })
                .collect::<Vec<_>>();
            serde_json::json!({
                "origin": { "row": layer.origin.row, "col": layer.origin.col },
                "lines": lines,
            })
        })
        .collect::<Vec<_>>();

    serde_json::json!({
        "terminal": {
            "width": size.width,
            "height": size.height,
        },
        "cursor": cursor,
        "layers": layers,
    })
}

fn color_to_json(color: Color) -> serde_json::Value {
    match color {
        Color::Reset => serde_json::json!("reset"),
        Color::Black => serde_json::json!("black"),
        Color::DarkGrey => serde_json::json!("dark_grey"),
        Color::Red => serde_json::json!("red"),
        Color::Green => serde_json::json!("green"),
        Color::Yellow => serde_json::json!("yellow"),
        Color::Blue => serde_json::json!("blue"),
        Color::Magenta => serde_json::json!("magenta"),
        Color::Cyan => serde_json::json!("cyan"),
        Color::White => serde_json::json!("white"),
        Color::Rgb { r, g, b } => serde_json::json!({
            "rgb": [r, g, b]
        }),
    }
}
