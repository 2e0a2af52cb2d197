//! Plain-text cube format
//!
//! The first line holds the cube size. It is followed by six blocks of `size`
//! lines, one block per face in top, left, front, right, back, bottom order.
//! Each line holds exactly `size` color letters out of `W B O G R Y`.
//!
//! ```text
//! 2
//! WW
//! WW
//! BB
//! ...
//! ```

use super::{Color, Cube, CubeError, FACES, Face, FormatError};
use std::fmt::Write;
use std::path::Path;

/// Load a cube from a text file.
pub fn load_cube_file(path: &Path) -> Result<Cube, CubeError> {
    let content = std::fs::read_to_string(path).map_err(|source| CubeError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(load_cube_str(&content)?)
}

/// Parse a cube from its text form.
pub fn load_cube_str(source: &str) -> Result<Cube, FormatError> {
    let lines: Vec<&str> = source.lines().map(str::trim).collect();

    let size_line = lines.first().copied().unwrap_or("");
    let size: usize = size_line
        .parse()
        .map_err(|_| FormatError::new(1, "expected cube size at first line", size_line))?;
    if size < 2 {
        return Err(FormatError::new(
            1,
            format!("cube size must be at least 2, got {}", size),
            size_line,
        ));
    }

    let expected_lines = FACES.checked_mul(size).and_then(|rows| rows.checked_add(1));
    if expected_lines.map_or(true, |expected| lines.len() < expected) {
        let index = lines.len().max(1);
        let face = Face::ALL[((index - 1) / size).min(FACES - 1)];
        return Err(FormatError::new(
            index + 1,
            format!("unexpected end of input in {:?} face, row {}", face, (index - 1) % size),
            "",
        ));
    }

    // every facelet comes from an input byte
    let mut facelets = Vec::with_capacity(source.len());
    for (face_index, face) in Face::ALL.into_iter().enumerate() {
        for row in 0..size {
            let index = 1 + face_index * size + row;
            let line_number = index + 1;

            let line = lines.get(index).copied().ok_or_else(|| {
                FormatError::new(
                    line_number,
                    format!("unexpected end of input in {:?} face, row {}", face, row),
                    "",
                )
            })?;

            if line.chars().count() != size {
                return Err(FormatError::new(
                    line_number,
                    format!("expected line of {} colors", size),
                    line,
                ));
            }

            for (column, letter) in line.chars().enumerate() {
                let color = Color::from_letter(letter).ok_or_else(|| {
                    FormatError::new(
                        line_number,
                        format!("expected color code, got '{}'", letter),
                        line,
                    )
                    .with_column(column + 1)
                })?;
                facelets.push(color);
            }
        }
    }

    Ok(Cube::from_facelets(size, facelets))
}

/// Render a cube in the text format read by `load_cube_str`.
///
/// Twist count and bound are search bookkeeping and are not written.
pub fn to_text(cube: &Cube) -> String {
    let size = cube.size();
    let mut out = String::with_capacity((FACES * size + 1) * (size + 1) + 4);
    let _ = writeln!(out, "{}", size);

    for face in Face::ALL {
        for row in 0..size {
            for column in 0..size {
                out.push(cube.facelet(face, row, column).letter());
            }
            out.push('\n');
        }
    }

    out
}
