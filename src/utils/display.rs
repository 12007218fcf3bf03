use crate::models::catalog::CatalogOption;
use crate::models::entry::{ItemKind, PriceEntry};
use chrono::{DateTime, Utc};
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

/// Kind-independent view of one entry, as shown on a price card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub price: String,
    pub description: Option<String>,
    pub updated: String,
    pub image: Option<String>,
    pub material: Option<String>,
}

impl CardFields {
    pub fn of(entry: &PriceEntry) -> Self {
        match entry {
            PriceEntry::Service(e) => Self {
                id: e.id,
                title: e.service_name.clone(),
                subtitle: e.category_name.clone(),
                price: format_rupees(&e.price),
                description: e.description.clone(),
                updated: format_short_date(&e.updated_at),
                image: e.image.clone(),
                material: None,
            },
            PriceEntry::Puja(e) => Self {
                id: e.id,
                title: e.puja_name.clone(),
                subtitle: match (&e.puja_type_name, &e.duration) {
                    (Some(kind), Some(duration)) => Some(format!("{kind} · {duration}")),
                    (Some(kind), None) => Some(kind.clone()),
                    (None, duration) => duration.clone(),
                },
                price: format_rupees(&e.price),
                description: e.description.clone(),
                updated: format_short_date(&e.updated_at),
                image: e.image.clone(),
                material: e.material_file_url.clone().or_else(|| e.material_file.clone()),
            },
        }
    }
}

/// One rendered entry with its edit/delete actions. The card only reports
/// which entry was acted on; the owner decides what happens.
pub struct PriceCard<'a> {
    fields: CardFields,
    on_edit: &'a dyn Fn(i64),
    on_delete: &'a dyn Fn(i64),
}

impl<'a> PriceCard<'a> {
    pub fn new(entry: &PriceEntry, on_edit: &'a dyn Fn(i64), on_delete: &'a dyn Fn(i64)) -> Self {
        Self {
            fields: CardFields::of(entry),
            on_edit,
            on_delete,
        }
    }

    pub fn fields(&self) -> &CardFields {
        &self.fields
    }

    pub fn edit(&self) {
        (self.on_edit)(self.fields.id);
    }

    pub fn delete(&self) {
        (self.on_delete)(self.fields.id);
    }
}

pub fn format_rupees(price: &str) -> String {
    format!("₹{}", price.trim())
}

pub fn format_short_date(at: &DateTime<Utc>) -> String {
    at.format("%d %b %Y").to_string()
}

pub struct DisplayFormatter;

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    pub fn format_price_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.add_row(Row::new(
            headers.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
        ));

        for row in rows {
            table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
        }

        table.to_string()
    }

    pub fn format_card(&self, card: &CardFields) -> String {
        let mut output = Vec::new();
        output.push(format!(
            "{} {}  {}",
            format!("#{}", card.id).dimmed(),
            card.title.bold(),
            card.price.green().bold()
        ));
        if let Some(subtitle) = &card.subtitle {
            output.push(format!("    {subtitle}"));
        }
        if let Some(description) = &card.description {
            output.push(format!("    {description}"));
        }
        if let Some(material) = &card.material {
            output.push(format!("    Material: {material}"));
        }
        output.push(format!("    Updated {}", card.updated).dimmed().to_string());
        output.join("\n")
    }

    /// Card list for the screen, or the empty state when there are none.
    pub fn format_price_list(&self, kind: ItemKind, cards: &[CardFields]) -> String {
        let mut output = vec![self.format_header(&format!("My {} prices", kind))];
        if cards.is_empty() {
            output.push(self.format_empty_state(kind));
        } else {
            output.extend(cards.iter().map(|card| self.format_card(card)));
        }
        output.join("\n")
    }

    pub fn format_empty_state(&self, kind: ItemKind) -> String {
        format!("No {} prices yet. Use `add` to create one.", kind)
            .italic()
            .to_string()
    }

    pub fn format_options(&self, options: &[CatalogOption]) -> String {
        let rows: Vec<Vec<String>> = options
            .iter()
            .map(|o| vec![o.id.to_string(), o.label.clone()])
            .collect();
        self.format_price_table(&["Id", "Name"], &rows)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("Error: {}", message).red().to_string()
    }

    pub fn format_success(&self, message: &str) -> String {
        message.green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::fixtures::{puja_entry, service_entry};
    use std::cell::RefCell;

    #[test]
    fn maps_service_fields() {
        let fields = CardFields::of(&service_entry(1, "100").into());
        assert_eq!(fields.title, "Service 1");
        assert_eq!(fields.subtitle.as_deref(), Some("Plumbing"));
        assert_eq!(fields.price, "₹100");
        assert_eq!(fields.updated, "09 Mar 2024");
        assert_eq!(fields.material, None);
    }

    #[test]
    fn maps_puja_fields() {
        let mut entry = puja_entry(4, " 2100 ");
        entry.material_file = Some("materials/4.pdf".into());
        let fields = CardFields::of(&entry.into());
        assert_eq!(fields.subtitle.as_deref(), Some("Griha Pravesh · 2 hours"));
        assert_eq!(fields.price, "₹2100");
        assert_eq!(fields.updated, "01 Nov 2024");
        assert_eq!(fields.material.as_deref(), Some("materials/4.pdf"));
    }

    #[test]
    fn card_reports_its_entry_id() {
        let edited = RefCell::new(Vec::new());
        let deleted = RefCell::new(Vec::new());
        let on_edit = |id: i64| edited.borrow_mut().push(id);
        let on_delete = |id: i64| deleted.borrow_mut().push(id);
        let entry: PriceEntry = service_entry(8, "80").into();

        let card = PriceCard::new(&entry, &on_edit, &on_delete);
        card.edit();
        card.delete();
        card.delete();

        assert_eq!(*edited.borrow(), vec![8]);
        assert_eq!(*deleted.borrow(), vec![8, 8]);
    }

    #[test]
    fn empty_list_shows_empty_state() {
        colored::control::set_override(false);
        let display = DisplayFormatter::new();
        let text = display.format_price_list(ItemKind::Service, &[]);
        assert!(text.contains("No service prices yet"));

        let card = CardFields::of(&service_entry(1, "100").into());
        let text = display.format_price_list(ItemKind::Service, &[card]);
        assert!(text.contains("₹100"));
        assert!(!text.contains("No service prices yet"));
    }
}
