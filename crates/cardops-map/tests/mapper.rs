use cardops_ingest::{InstructionFilter, locate_header};
use cardops_map::map_rows;
use cardops_model::Grid;
use cardops_standards::{ScreenRegistry, sample_grid};

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

#[test]
fn maps_rows_after_header_with_file_line_numbers() {
    let registry = ScreenRegistry::load_default().expect("load screens");
    let screen = registry
        .screen("alterar_status_cartao")
        .expect("status screen");
    let filter = InstructionFilter::new(&screen.keywords);
    let grid = Grid::new(vec![
        strings(&["", "PLANILHA PARA ALTERAÇÃO DE STATUS DO CARTÃO"]),
        Vec::new(),
        strings(&["Tipo de Movimentação", "CPF", "Coluna Extra", "Nome Completo"]),
        strings(&["OBRIGATÓRIO", "OBRIGATÓRIO", "", "OBRIGATÓRIO"]),
        strings(&["Ativar", " 529.982.247-25 ", "ignorado", "maria silva"]),
        strings(&["", "", "", ""]),
        strings(&["Bloquear", "11144477735"]),
    ]);

    let header = locate_header(&grid, &screen.expected_columns(), &filter).expect("header");
    let records = map_rows(&grid, header, &screen.mapping(), &filter);

    assert_eq!(header, 2);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source_row, 5);
    assert_eq!(records[0].get("cpf"), "529.982.247-25");
    assert_eq!(records[0].get("nome"), "maria silva");
    assert_eq!(records[0].get("movimentacao"), "Ativar");
    assert!(!records[0].values.contains_key("Coluna Extra"));

    assert_eq!(records[1].source_row, 7);
    assert_eq!(records[1].get("nome"), "");
}

#[test]
fn sample_template_maps_to_no_records() {
    let registry = ScreenRegistry::load_default().expect("load screens");
    for screen in registry.screens() {
        let filter = InstructionFilter::new(&screen.keywords);
        let grid = sample_grid(screen);
        let header = locate_header(&grid, &screen.expected_columns(), &filter)
            .unwrap_or_else(|e| panic!("{}: {e}", screen.id));
        assert_eq!(header, 2, "{}", screen.id);
        let records = map_rows(&grid, header, &screen.mapping(), &filter);
        assert!(records.is_empty(), "{} produced data rows", screen.id);
    }
}
