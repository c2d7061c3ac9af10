//! Comma-separated material tables

use crate::distribution::TableError;

pub(super) struct ParsedTable {
    pub energies: Vec<f64>,
    pub angles: Vec<f64>,
    pub cells: Vec<[f64; 4]>,
    pub has_backscattering: bool,
}

/// Rows of one component: energies, and the probabilities at each angle
#[derive(Default)]
struct Section {
    energies: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

fn section_index(marker: &str) -> Option<usize> {
    match marker.to_lowercase().as_str() {
        "diffuse" => Some(1),
        "back" => Some(2),
        "transparent" => Some(3),
        _ => None,
    }
}

fn parse_cells(name: &str, line_no: usize, cells: &[&str]) -> Result<Vec<f64>, TableError> {
    cells.iter()
        .map(|c| c.parse::<f64>().map_err(|_| TableError::Parse(name.to_owned(), line_no, c.to_string())))
        .collect()
}

pub(super) fn parse_sections(name: &str, text: &str) -> Result<ParsedTable, TableError> {
    let mut lines = text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let (line_no, header) = lines.next()
        .ok_or_else(|| TableError::Missing(name.to_owned(), "the angle header".to_owned()))?;
    let header: Vec<&str> = header.split(',').map(|c| c.trim()).collect();
    let angles = parse_cells(name, line_no, &header[1..])?;

    let mut sections: [Option<Section>; 4] = [Some(Section::default()), None, None, None];
    let mut current = 0;

    for (line_no, line) in lines {
        let cells: Vec<&str> = line.split(',').map(|c| c.trim()).collect();

        if let Some(index) = section_index(cells[0]) {
            if sections[index].is_some() {
                return Err(TableError::Invalid(name.to_owned(), format!("section '{}' appears twice (line {})", cells[0], line_no)));
            }
            sections[index] = Some(Section::default());
            current = index;
            continue;
        }

        if cells.len() != angles.len() + 1 {
            return Err(TableError::Shape(format!("{} (line {})", name, line_no), angles.len() + 1, cells.len()));
        }

        let values = parse_cells(name, line_no, &cells)?;
        if let Some(section) = sections[current].as_mut() {
            section.energies.push(values[0]);
            section.rows.push(values[1..].to_vec());
        }
    }

    let [forward, diffuse, back, transparent] = sections;
    let forward = forward.unwrap_or_default();
    if forward.rows.is_empty() {
        return Err(TableError::Missing(name.to_owned(), "forward reflection rows".to_owned()));
    }

    let extra = [diffuse, back, transparent];
    let has_backscattering = extra.iter().any(|s| s.is_some());
    for (section, label) in extra.iter().zip(["diffuse", "back", "transparent"].iter()) {
        if let Some(section) = section {
            if section.energies != forward.energies {
                return Err(TableError::Invalid(name.to_owned(), format!("the {} section must list the same energies as the forward section", label)));
            }
        }
    }

    let mut cells = Vec::with_capacity(forward.energies.len() * angles.len());
    for (i, row) in forward.rows.iter().enumerate() {
        for (j, &p) in row.iter().enumerate() {
            let mut cell = [p, 0.0, 0.0, 0.0];
            for (k, section) in extra.iter().enumerate() {
                if let Some(section) = section {
                    cell[k + 1] = section.rows[i][j];
                }
            }
            cells.push(cell);
        }
    }

    Ok(ParsedTable {
        energies: forward.energies,
        angles,
        cells,
        has_backscattering,
    })
}
