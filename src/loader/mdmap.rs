// src/loader/mdmap.rs
//
// Markdown-flavoured level text:
//
//   # Level: Meadow
//   Size: 8x6
//   Layers:
//     - terrain
//     - units
//
//   [legend: terrain]
//   G = Grass (swaying)
//   W = Water
//
//   [layer: terrain]
//   ~~~~~~~~
//   GGGWWGGG
//   ...
//   ~~~~~~~~
//
// `.` and spaces are empty cells. Short rows and missing rows are padded
// with empty cells; header layers without a grid are empty.

use std::collections::HashMap;

use crate::error::LevelError;
use crate::level::{Level, LevelHeader, LevelLayer, TileTypeId};
use crate::tiles::TileRegistry;

const FENCE: &str = "~~~";

/// Symbol -> description table of one layer.
pub type Legend = HashMap<char, String>;

/// Parses `.mdmap` text into a validated [`Level`].
pub fn parse_mdmap(text: &str, registry: &TileRegistry) -> Result<Level, LevelError> {
    let lines: Vec<&str> = text.lines().collect();

    let mut name = None;
    let mut size = None;
    let mut layer_names: Option<Vec<String>> = None;
    let mut legends: HashMap<String, Legend> = HashMap::new();
    let mut grids: Vec<(String, Vec<&str>)> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line_no = i + 1;
        let line = lines[i].trim();
        i += 1;

        if let Some(rest) = line.strip_prefix("# Level:") {
            name = Some(rest.trim().to_owned());
        } else if let Some(rest) = line.strip_prefix("Size:") {
            size = Some(parse_size(rest, line_no)?);
        } else if line.starts_with("Layers:") {
            let mut names = Vec::new();
            while let Some(entry) = lines.get(i).and_then(|l| l.trim().strip_prefix('-')) {
                names.push(entry.trim().to_owned());
                i += 1;
            }
            layer_names = Some(names);
        } else if let Some(layer) = section(line, "legend") {
            let legend = legends.entry(layer.to_owned()).or_default();
            while let Some(entry) = lines.get(i).filter(|l| !l.trim_start().starts_with('[')) {
                let line_no = i + 1;
                i += 1;
                let Some((symbol, description)) = entry.split_once('=') else {
                    continue;
                };
                let symbol = single_char(symbol.trim()).ok_or_else(|| LevelError::Syntax {
                    line: line_no,
                    message: format!("legend symbol `{}` must be one character", symbol.trim()),
                })?;
                legend.insert(symbol, description.trim().to_owned());
            }
        } else if let Some(layer) = section(line, "layer") {
            if !lines.get(i).is_some_and(|l| l.trim().starts_with(FENCE)) {
                return Err(LevelError::Syntax {
                    line: line_no + 1,
                    message: format!("layer `{layer}` grid must start with a `{FENCE}` fence"),
                });
            }
            i += 1;
            let start = i;
            while lines.get(i).is_some_and(|l| !l.trim().starts_with(FENCE)) {
                i += 1;
            }
            if i >= lines.len() {
                return Err(LevelError::Syntax {
                    line: start,
                    message: format!("layer `{layer}` grid is not closed"),
                });
            }
            grids.push((layer.to_owned(), lines[start..i].to_vec()));
            i += 1;
        } else if line.starts_with('[') {
            return Err(LevelError::Syntax {
                line: line_no,
                message: format!("unknown section {line}"),
            });
        }
    }

    let header = LevelHeader {
        name: name.ok_or(LevelError::MissingHeader("Level"))?,
        width: size.ok_or(LevelError::MissingHeader("Size"))?.0,
        height: size.ok_or(LevelError::MissingHeader("Size"))?.1,
        layers: layer_names.ok_or(LevelError::MissingHeader("Layers"))?,
    };

    if let Some(stray) = legends.keys().find(|l| !header.layers.contains(l)) {
        return Err(LevelError::UnknownLayer(stray.clone()));
    }

    let empty = Legend::new();
    let mut layers = Vec::with_capacity(header.layers.len());
    for (layer, rows) in &grids {
        if !header.layers.contains(layer) {
            return Err(LevelError::UnknownLayer(layer.clone()));
        }
        let legend = legends.get(layer).unwrap_or(&empty);
        layers.push(grid_to_layer(layer, rows, legend, &header, registry)?);
    }
    for name in &header.layers {
        if !layers.iter().any(|l: &LevelLayer| l.name == *name) {
            layers.push(LevelLayer::empty(name.clone(), header.width, header.height));
        }
    }

    Level::new(header, layers)
}

/// Resolves a text grid into a layer. Shared by every text-based loader.
pub(crate) fn grid_to_layer<S: AsRef<str>>(
    layer: &str,
    rows: &[S],
    legend: &Legend,
    header: &LevelHeader,
    registry: &TileRegistry,
) -> Result<LevelLayer, LevelError> {
    let (width, height) = (header.width, header.height);
    let mismatch = |found: (u32, u32)| LevelError::DimensionMismatch {
        layer: layer.to_owned(),
        expected: (width, height),
        found,
    };

    let mut cells = vec![None; width as usize * height as usize];
    for (y, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if y as u32 >= height {
            if row.trim().is_empty() {
                continue;
            }
            return Err(mismatch((width, rows.len() as u32)));
        }
        for (x, symbol) in row.chars().enumerate() {
            if x as u32 >= width {
                if symbol.is_whitespace() {
                    continue;
                }
                return Err(mismatch((row.chars().count() as u32, height)));
            }
            let (x, y) = (x as u32, y as u32);
            cells[(y * width + x) as usize] = resolve(symbol, legend, registry).map_err(|()| {
                LevelError::UnknownSymbol {
                    layer: layer.to_owned(),
                    symbol,
                    x,
                    y,
                }
            })?;
        }
    }
    Ok(LevelLayer::new(layer, cells))
}

fn resolve(
    symbol: char,
    legend: &Legend,
    registry: &TileRegistry,
) -> Result<Option<TileTypeId>, ()> {
    if symbol == '.' || symbol.is_whitespace() {
        return Ok(None);
    }
    legend
        .get(&symbol)
        .and_then(|description| registry.resolve_name(description))
        .or_else(|| registry.resolve_symbol(symbol))
        .map(Some)
        .ok_or(())
}

// `[legend: terrain]` -> Some("terrain") for kind "legend".
fn section<'a>(line: &'a str, kind: &str) -> Option<&'a str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let (head, name) = inner.split_once(':')?;
    (head.trim() == kind).then(|| name.trim()).filter(|n| !n.is_empty())
}

fn parse_size(text: &str, line: usize) -> Result<(u32, u32), LevelError> {
    let syntax = || LevelError::Syntax {
        line,
        message: format!("size `{}` is not WIDTHxHEIGHT", text.trim()),
    };
    let (w, h) = text.trim().split_once(|c: char| c == 'x' || c == 'X').ok_or_else(syntax)?;
    let w = w.trim().parse().map_err(|_| syntax())?;
    let h = h.trim().parse().map_err(|_| syntax())?;
    Ok((w, h))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
