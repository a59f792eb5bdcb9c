use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{ExportOutcome, FileOutcome, ImportResult, RecordResult, SubmissionOutcome};

pub fn print_import_summary(result: &ImportResult) {
    println!("Tela: {}", result.screen);
    println!("Contrato: {}", result.contract);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Arquivo"),
        header_cell("Cabeçalho"),
        header_cell("Linhas"),
        header_cell("Válidas"),
        header_cell("Rejeitadas"),
        header_cell("Situação"),
    ]);
    apply_table_style(&mut table);
    for column in 1..=4 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for file in &result.files {
        let name = file.path.display().to_string();
        match &file.outcome {
            FileOutcome::Imported(report) => table.add_row(vec![
                Cell::new(name),
                Cell::new(report.header_index + 1),
                Cell::new(report.rows),
                count_cell(report.accepted, Color::Green),
                count_cell(report.rejected.len(), Color::Red),
                Cell::new(report.success_message().unwrap_or_default()),
            ]),
            FileOutcome::Failed { message, .. } => table.add_row(vec![
                Cell::new(name),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(message).fg(Color::Red),
            ]),
        };
    }
    println!("{table}");
    println!("Registros na tabela: {}", result.staged);
    for file in &result.files {
        if let FileOutcome::Failed { detail, .. } = &file.outcome {
            eprintln!("error: {}: {detail}", file.path.display());
        }
    }

    print_rejections(result);

    match &result.export {
        Some(ExportOutcome::Written(path)) => println!("Arquivo exportado: {}", path.display()),
        Some(ExportOutcome::Failed { message }) => eprintln!("error: {message}"),
        None => {}
    }
    match &result.submission {
        Some(SubmissionOutcome::Sent { records }) => {
            println!("Enviados {records} registros.");
        }
        Some(SubmissionOutcome::DryRun { payload }) => println!("{payload}"),
        Some(SubmissionOutcome::Failed { message, detail }) => {
            eprintln!("error: {message} ({detail})");
        }
        None => {}
    }
}

fn print_rejections(result: &ImportResult) {
    if result.rejected_rows() == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Arquivo"),
        header_cell("Linha"),
        header_cell("Campo"),
        header_cell("Mensagem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for file in &result.files {
        let FileOutcome::Imported(report) = &file.outcome else {
            continue;
        };
        let name = file
            .path
            .file_name()
            .map_or_else(|| file.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        for diagnostic in &report.rejected {
            for issue in &diagnostic.issues {
                table.add_row(vec![
                    Cell::new(&name),
                    Cell::new(diagnostic.row),
                    Cell::new(&issue.column).fg(Color::Yellow),
                    Cell::new(&issue.message),
                ]);
            }
        }
    }
    println!("{table}");
}

pub fn print_record_result(result: &RecordResult) {
    let (title, values, color) = match result {
        RecordResult::Valid(values) => ("Registro válido", values, Color::Green),
        RecordResult::Invalid(errors) => ("Registro inválido", errors, Color::Red),
    };
    let mut table = Table::new();
    table.set_header(vec![header_cell("Campo"), header_cell(title)]);
    apply_table_style(&mut table);
    for (field, value) in values {
        table.add_row(vec![Cell::new(field), Cell::new(value).fg(color)]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
