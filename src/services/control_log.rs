//! Control log service: powered equipment and its usage entries

use std::str::FromStr;

use chrono::Utc;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use super::changes::{ChangeHub, Collection};
use crate::{
    error::{AppError, AppResult},
    models::control_log::{
        CategoryGroup, CategoryStats, LogEquipment, SaveLogEquipment, SaveUsageEntry, UsageEntry,
    },
    repository::Repository,
};

/// Group used for equipment without a category
pub const UNCATEGORIZED: &str = "Ostalo";

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.]+").expect("valid regex"));
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(\.\d*)?|\.\d+)").expect("valid regex"));

#[derive(Clone)]
pub struct ControlLogService {
    repository: Repository,
    changes: ChangeHub,
    categories: Vec<String>,
}

impl ControlLogService {
    pub fn new(repository: Repository, changes: ChangeHub, categories: Vec<String>) -> Self {
        Self {
            repository,
            changes,
            categories,
        }
    }

    /// Configured category order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub async fn list(&self) -> AppResult<Vec<LogEquipment>> {
        self.repository.control_log.list().await
    }

    /// Equipment grouped by category with per-category statistics
    pub async fn overview(&self) -> AppResult<Vec<CategoryGroup>> {
        let equipment = self.repository.control_log.list().await?;
        Ok(group_by_category(&self.categories, equipment))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<LogEquipment> {
        self.repository.control_log.get_by_id(id).await
    }

    pub async fn create(&self, data: SaveLogEquipment) -> AppResult<LogEquipment> {
        self.create_with_entries(Uuid::new_v4(), data, Vec::new()).await
    }

    pub async fn create_with_entries(
        &self,
        id: Uuid,
        data: SaveLogEquipment,
        entries: Vec<UsageEntry>,
    ) -> AppResult<LogEquipment> {
        let data = trim_equipment(data);
        data.validate()?;

        let equipment = self
            .repository
            .control_log
            .create(id, &data.name, &data.category, entries)
            .await?;
        tracing::info!(equipment_id = %equipment.id, category = %data.category, "Log equipment created");
        self.changes.publish(Collection::ControlLogEquipment);
        Ok(equipment)
    }

    /// Rename or move equipment; entries are untouched
    pub async fn update(&self, id: Uuid, data: SaveLogEquipment) -> AppResult<LogEquipment> {
        let data = trim_equipment(data);
        data.validate()?;

        let equipment = self
            .repository
            .control_log
            .update(id, &data.name, &data.category)
            .await?;
        tracing::info!(equipment_id = %id, "Log equipment updated");
        self.changes.publish(Collection::ControlLogEquipment);
        Ok(equipment)
    }

    /// Delete equipment together with its entries
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.control_log.delete(id).await?;
        tracing::info!(equipment_id = %id, "Log equipment deleted");
        self.changes.publish(Collection::ControlLogEquipment);
        Ok(())
    }

    /// Add an entry at the top of the ledger
    pub async fn add_entry(&self, equipment_id: Uuid, data: SaveUsageEntry) -> AppResult<LogEquipment> {
        let equipment = self.repository.control_log.get_by_id(equipment_id).await?;
        let entry = build_entry(new_entry_id(), data)?;

        let mut entries = equipment.entries.0;
        entries.insert(0, entry);
        self.save_entries(equipment_id, entries).await
    }

    /// Replace an entry, keeping its id
    pub async fn update_entry(
        &self,
        equipment_id: Uuid,
        entry_id: &str,
        data: SaveUsageEntry,
    ) -> AppResult<LogEquipment> {
        let equipment = self.repository.control_log.get_by_id(equipment_id).await?;
        let mut entries = equipment.entries.0;

        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| AppError::NotFound(format!("Entry {} not found", entry_id)))?;
        *slot = build_entry(entry_id.to_string(), data)?;

        self.save_entries(equipment_id, entries).await
    }

    pub async fn delete_entry(&self, equipment_id: Uuid, entry_id: &str) -> AppResult<LogEquipment> {
        let equipment = self.repository.control_log.get_by_id(equipment_id).await?;
        let mut entries = equipment.entries.0;

        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        if entries.len() == before {
            return Err(AppError::NotFound(format!("Entry {} not found", entry_id)));
        }

        self.save_entries(equipment_id, entries).await
    }

    async fn save_entries(&self, equipment_id: Uuid, entries: Vec<UsageEntry>) -> AppResult<LogEquipment> {
        let count = entries.len();
        let equipment = self.repository.control_log.set_entries(equipment_id, entries).await?;
        tracing::info!(equipment_id = %equipment_id, entries = count, "Control log entries saved");
        self.changes.publish(Collection::ControlLogEquipment);
        Ok(equipment)
    }
}

fn trim_equipment(data: SaveLogEquipment) -> SaveLogEquipment {
    SaveLogEquipment {
        name: data.name.trim().to_string(),
        category: data.category.trim().to_string(),
    }
}

/// `e_<millis>_<6 base36 chars>`
pub fn new_entry_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("e_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Validate input and compute the duration label
pub fn build_entry(id: String, data: SaveUsageEntry) -> AppResult<UsageEntry> {
    let data = SaveUsageEntry {
        user: data.user.trim().to_string(),
        ..data
    };
    data.validate()?;
    let date = data
        .date
        .ok_or_else(|| AppError::Validation("Date is required".to_string()))?;

    let time_from = data.time_from.trim().to_string();
    let time_to = data.time_to.trim().to_string();
    let minutes = entry_minutes(&time_from, &time_to);

    Ok(UsageEntry {
        id,
        title: data.title.trim().to_string(),
        date,
        duration: if minutes > 0 { minutes_to_hm(minutes) } else { "—".to_string() },
        time_from,
        time_to,
        description: data.description.trim().to_string(),
        fuel_added: data.fuel_added.trim().to_string(),
        user: data.user,
    })
}

/// `"HH:MM"` to minutes after midnight; anything unparsable is 0.
/// Seconds are ignored and a blank minutes part counts as 0.
pub fn time_to_minutes(value: &str) -> i64 {
    let mut parts = value.trim().split(':');
    let hours = parts.next().and_then(|h| h.trim().parse::<i64>().ok());
    let minutes = parts.next().and_then(|m| match m.trim() {
        "" => Some(0),
        m => m.parse::<i64>().ok(),
    });
    match (hours, minutes) {
        (Some(h), Some(m)) => h * 60 + m,
        _ => 0,
    }
}

/// `"<h>h <m>m"`
pub fn minutes_to_hm(minutes: i64) -> String {
    format!("{}h {}m", minutes.div_euclid(60), minutes.rem_euclid(60))
}

/// Minutes between two times; 0 when either is missing or the range is
/// inverted
pub fn entry_minutes(time_from: &str, time_to: &str) -> i64 {
    if time_from.trim().is_empty() || time_to.trim().is_empty() {
        return 0;
    }
    (time_to_minutes(time_to) - time_to_minutes(time_from)).max(0)
}

/// Litres from free text such as `"2,5 L"`. The first comma is the decimal
/// separator, other non-numeric characters are dropped.
pub fn parse_litres(value: &str) -> Decimal {
    let normalized = value.trim().replacen(',', ".", 1);
    let digits = NON_NUMERIC.replace_all(&normalized, "");
    LEADING_NUMBER
        .find(&digits)
        .map(|m| m.as_str().trim_end_matches('.'))
        .and_then(|n| Decimal::from_str(n).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Totals for a set of equipment
pub fn category_stats(items: &[LogEquipment]) -> CategoryStats {
    let mut stats = CategoryStats::default();
    for entry in items.iter().flat_map(|e| e.entries.iter()) {
        stats.entries += 1;
        stats.minutes += entry_minutes(&entry.time_from, &entry.time_to);
        stats.litres += parse_litres(&entry.fuel_added);
    }
    stats.duration = minutes_to_hm(stats.minutes);
    stats
}

/// Group equipment by category: configured categories first (even when
/// empty), then unknown ones in order of appearance
pub fn group_by_category(order: &[String], equipment: Vec<LogEquipment>) -> Vec<CategoryGroup> {
    let mut groups: IndexMap<String, Vec<LogEquipment>> =
        order.iter().map(|c| (c.clone(), Vec::new())).collect();

    for item in equipment {
        let key = item
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        groups.entry(key).or_default().push(item);
    }

    groups
        .into_iter()
        .map(|(category, items)| CategoryGroup {
            stats: category_stats(&items),
            category,
            items,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::types::Json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn entry(from: &str, to: &str, fuel: &str) -> UsageEntry {
        UsageEntry {
            id: new_entry_id(),
            title: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time_from: from.to_string(),
            time_to: to.to_string(),
            duration: String::new(),
            description: String::new(),
            fuel_added: fuel.to_string(),
            user: "Ivan".to_string(),
        }
    }

    fn equipment(name: &str, category: Option<&str>, entries: Vec<UsageEntry>) -> LogEquipment {
        LogEquipment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.map(str::to_string),
            entries: Json(entries),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn input(date: Option<NaiveDate>, user: &str) -> SaveUsageEntry {
        SaveUsageEntry {
            title: " Probni rad ".to_string(),
            date,
            time_from: "08:15".to_string(),
            time_to: "09:45".to_string(),
            description: String::new(),
            fuel_added: "1,5 L".to_string(),
            user: user.to_string(),
        }
    }

    #[test]
    fn test_time_helpers() {
        assert_eq!(time_to_minutes("08:30"), 510);
        assert_eq!(time_to_minutes("8:05"), 485);
        assert_eq!(time_to_minutes("08:30:00"), 510);
        assert_eq!(time_to_minutes("8:"), 480);
        assert_eq!(time_to_minutes("8"), 0);
        assert_eq!(time_to_minutes("abc"), 0);
        assert_eq!(time_to_minutes(""), 0);
        assert_eq!(minutes_to_hm(95), "1h 35m");
        assert_eq!(minutes_to_hm(0), "0h 0m");
        assert_eq!(entry_minutes("10:00", "09:00"), 0);
        assert_eq!(entry_minutes("", "09:00"), 0);
    }

    #[test]
    fn test_parse_litres() {
        assert_eq!(parse_litres("2,5 L"), dec("2.5"));
        assert_eq!(parse_litres("10 l"), dec("10"));
        assert_eq!(parse_litres("  0.75L "), dec("0.75"));
        assert_eq!(parse_litres("1.2.3"), dec("1.2"));
        assert_eq!(parse_litres("puno"), Decimal::ZERO);
        assert_eq!(parse_litres(""), Decimal::ZERO);
    }

    #[test]
    fn test_entry_id_format() {
        let id = new_entry_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "e");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_build_entry() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let e = build_entry("e_1_abcdef".to_string(), input(date, " Marko ")).unwrap();
        assert_eq!(e.title, "Probni rad");
        assert_eq!(e.duration, "1h 30m");
        assert_eq!(e.user, "Marko");

        let mut no_times = input(date, "Marko");
        no_times.time_to.clear();
        assert_eq!(build_entry("x".to_string(), no_times).unwrap().duration, "—");
    }

    #[test]
    fn test_build_entry_requires_date_and_user() {
        assert!(matches!(
            build_entry("x".to_string(), input(None, "Marko")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            build_entry("x".to_string(), input(NaiveDate::from_ymd_opt(2025, 1, 1), "  ")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_group_by_category() {
        let order = vec!["Motorne pile".to_string(), "Pumpe".to_string()];
        let groups = group_by_category(
            &order,
            vec![
                equipment("Stihl", Some("Motorne pile"), vec![
                    entry("08:00", "09:30", "2,5 L"),
                    entry("10:00", "10:20", ""),
                ]),
                equipment("Honda", Some("Agregati"), vec![entry("12:00", "13:00", "1 L")]),
                equipment("Stara pila", None, Vec::new()),
            ],
        );

        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["Motorne pile", "Pumpe", "Agregati", UNCATEGORIZED]);

        let saws = &groups[0].stats;
        assert_eq!(saws.entries, 2);
        assert_eq!(saws.minutes, 110);
        assert_eq!(saws.duration, "1h 50m");
        assert_eq!(saws.litres, dec("2.5"));

        assert!(groups[1].items.is_empty());
        assert_eq!(groups[1].stats.entries, 0);
        assert_eq!(groups[3].items.len(), 1);
    }
}
