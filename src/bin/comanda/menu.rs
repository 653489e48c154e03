//! Menu listing

use std::io;

use comanda::catalog::{Catalog, MenuItem, MenuQuery};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Writes the items matching `query` as a table, followed by the category counts.
pub(crate) fn write_menu(
    out: &mut impl io::Write,
    catalog: &Catalog,
    query: &MenuQuery,
) -> io::Result<usize> {
    let mut builder = Builder::default();
    let mut shown = 0_usize;

    builder.push_record(["Id", "Plato", "Categoría", "Precio", "★", "Tiempo", "Dieta"]);

    for item in catalog.search(query) {
        builder.push_record(item_row(catalog, item));
        shown += 1;
    }

    if shown == 0 {
        writeln!(out, "No se encontraron platos")?;

        return Ok(0);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")?;

    let counts = catalog
        .categories()
        .iter()
        .map(|category| format!("{} ({})", category.name, category.count))
        .collect::<Vec<_>>()
        .join(" · ");

    writeln!(out, "{counts}")?;

    Ok(shown)
}

fn item_row(catalog: &Catalog, item: &MenuItem) -> [String; 7] {
    let category = catalog
        .category(&item.category)
        .map_or_else(|| item.category.clone(), |category| category.name.clone());

    [
        item.id.to_string(),
        item.name.clone(),
        category,
        item.price.money(catalog.currency()).to_string(),
        format!("{:.1}", item.rating),
        item.prep_time_label(),
        item.dietary.iter().collect::<Vec<_>>().join(", "),
    ]
}
