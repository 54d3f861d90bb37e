use unicode_width::UnicodeWidthStr;

pub fn pad_cells(s: &str, field_cells: usize) -> String {
    let w = s.width();
    let pad = field_cells.saturating_sub(w);
    format!("{s}{}", " ".repeat(pad))
}

/// Writes `header` and `rows` as left-aligned columns separated by two spaces.
///
/// Column widths are measured in terminal cells, so wide glyphs on text
/// faces line up.
pub fn write_grid(
    f: &mut impl std::fmt::Write,
    header: &[String],
    rows: &[Vec<String>],
) -> std::fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.width());
            } else {
                widths.push(cell.width());
            }
        }
    }

    write_line(f, header, &widths)?;
    for row in rows {
        write_line(f, row, &widths)?;
    }
    Ok(())
}

fn write_line(
    f: &mut impl std::fmt::Write,
    cells: &[String],
    widths: &[usize],
) -> std::fmt::Result {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, &w)| pad_cells(cell, w))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}
