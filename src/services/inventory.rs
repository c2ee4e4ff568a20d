//! Check-out book service: stock items, availability and check-outs
//!
//! Availability is derived, never stored: `total - number of check-outs`.
//! Checks read then write without locking, so two concurrent check-outs of
//! the last piece can both succeed.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use super::changes::{ChangeHub, Collection};
use crate::{
    error::{AppError, AppResult},
    models::{
        inventory::{
            clean_tag, BulkCheckout, BulkCheckoutRow, Checkout, CheckoutDetails, CheckoutQuery,
            CreateCheckout, Procure, RowError, StockItem, StockItemAvailability, StockSummary,
            UpdateCheckout, UpdateStockItem,
        },
        member::Member,
    },
    names::clean_name,
    repository::{checkouts::NewCheckout, Repository},
};

/// Download name of the check-out book export
pub const CSV_FILE_NAME: &str = "knjiga_zaduzenja.csv";

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
    changes: ChangeHub,
}

impl InventoryService {
    pub fn new(repository: Repository, changes: ChangeHub) -> Self {
        Self { repository, changes }
    }

    // -----------------------------------------------------------------------
    // Stock items
    // -----------------------------------------------------------------------

    /// All stock items with their availability
    pub async fn list_items(&self) -> AppResult<Vec<StockItemAvailability>> {
        let items = self.repository.stock_items.list().await?;
        let counts = self.repository.checkouts.counts_by_item().await?;
        Ok(with_availability(items, &counts))
    }

    pub async fn get_item(&self, id: Uuid) -> AppResult<StockItemAvailability> {
        let item = self.repository.stock_items.get_by_id(id).await?;
        let checked_out = self.repository.checkouts.count_for_item(id, None).await?;
        Ok(availability(item, checked_out))
    }

    pub async fn summary(&self) -> AppResult<StockSummary> {
        Ok(summarize(self.list_items().await?))
    }

    /// Add pieces to the item with the same name, or create it
    pub async fn procure(&self, data: Procure) -> AppResult<StockItem> {
        self.procure_with_id(Uuid::new_v4(), data).await
    }

    pub async fn procure_with_id(&self, id: Uuid, data: Procure) -> AppResult<StockItem> {
        let data = Procure {
            name: data.name.trim().to_string(),
            ..data
        };
        data.validate()?;

        let item = match self.repository.stock_items.find_by_name(&data.name).await? {
            Some(existing) => {
                let item = self
                    .repository
                    .stock_items
                    .add_quantity(existing.id, data.quantity)
                    .await?;
                tracing::info!(stock_item_id = %item.id, added = data.quantity, total = item.total, "Stock replenished");
                item
            }
            None => {
                let item = self
                    .repository
                    .stock_items
                    .create(id, &data.name, data.quantity)
                    .await?;
                tracing::info!(stock_item_id = %item.id, total = item.total, "Stock item created");
                item
            }
        };

        self.changes.publish(Collection::StockItems);
        Ok(item)
    }

    /// Edit name and total; the total may not drop below what is checked out
    pub async fn update_item(&self, id: Uuid, data: UpdateStockItem) -> AppResult<StockItem> {
        let data = UpdateStockItem {
            name: data.name.trim().to_string(),
            ..data
        };
        data.validate()?;

        let checked_out = self.repository.checkouts.count_for_item(id, None).await?;
        if i64::from(data.total) < checked_out {
            return Err(AppError::BusinessRule(format!(
                "Total cannot be lower than the {} pieces checked out",
                checked_out
            )));
        }

        let item = self.repository.stock_items.update(id, &data.name, data.total).await?;
        tracing::info!(stock_item_id = %id, total = item.total, "Stock item updated");
        self.changes.publish(Collection::StockItems);
        Ok(item)
    }

    /// Delete an item that has no check-outs
    pub async fn delete_item(&self, id: Uuid) -> AppResult<()> {
        let checked_out = self.repository.checkouts.count_for_item(id, None).await?;
        if checked_out > 0 {
            return Err(AppError::BusinessRule(format!(
                "Stock item has {} check-outs and cannot be deleted",
                checked_out
            )));
        }

        self.repository.stock_items.delete(id).await?;
        tracing::info!(stock_item_id = %id, "Stock item deleted");
        self.changes.publish(Collection::StockItems);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Check-outs
    // -----------------------------------------------------------------------

    /// Check-outs with display names, filtered and newest first
    pub async fn list_checkouts(&self, query: &CheckoutQuery) -> AppResult<Vec<CheckoutDetails>> {
        let checkouts = self.repository.checkouts.list(query).await?;
        let members = self.repository.members.list().await?;
        let items = self.repository.stock_items.list().await?;

        let details = with_names(checkouts, &members, &items);
        Ok(match query.q.as_deref() {
            Some(q) => filter_details(details, q, &members),
            None => details,
        })
    }

    pub async fn get_checkout(&self, id: Uuid) -> AppResult<Checkout> {
        self.repository.checkouts.get_by_id(id).await
    }

    /// Check out one piece to a member
    pub async fn checkout(&self, data: CreateCheckout) -> AppResult<Checkout> {
        self.checkout_with_id(Uuid::new_v4(), data).await
    }

    pub async fn checkout_with_id(&self, id: Uuid, data: CreateCheckout) -> AppResult<Checkout> {
        let record = self.prepare(&data, None).await?;
        let checkout = self.repository.checkouts.create(id, &record).await?;
        tracing::info!(
            checkout_id = %checkout.id,
            member_id = %checkout.member_id,
            stock_item_id = %checkout.stock_item_id,
            "Item checked out"
        );
        self.changes.publish(Collection::Checkouts);
        Ok(checkout)
    }

    /// Edit a check-out; availability is computed without the record itself
    pub async fn update_checkout(&self, id: Uuid, data: UpdateCheckout) -> AppResult<Checkout> {
        self.repository.checkouts.get_by_id(id).await?;
        let record = self.prepare(&data, Some(id)).await?;

        let checkout = self.repository.checkouts.update(id, &record).await?;
        tracing::info!(checkout_id = %id, "Checkout updated");
        self.changes.publish(Collection::Checkouts);
        Ok(checkout)
    }

    /// Return a piece (remove the check-out)
    pub async fn delete_checkout(&self, id: Uuid) -> AppResult<()> {
        self.repository.checkouts.delete(id).await?;
        tracing::info!(checkout_id = %id, "Checkout removed");
        self.changes.publish(Collection::Checkouts);
        Ok(())
    }

    /// Check out several items to one member. Nothing is written unless
    /// every row is valid.
    pub async fn bulk_checkout(&self, data: BulkCheckout) -> AppResult<Result<Vec<Checkout>, Vec<RowError>>> {
        self.repository.members.get_by_id(data.member_id).await?;
        if data.rows.is_empty() {
            return Err(AppError::Validation("At least one row is required".to_string()));
        }

        let available: HashMap<Uuid, i64> = self
            .list_items()
            .await?
            .into_iter()
            .map(|a| (a.item.id, a.available))
            .collect();

        if let Err(errors) = validate_bulk_rows(&data.rows, &available) {
            return Ok(Err(errors));
        }

        let date = data.checkout_date.unwrap_or_else(|| Utc::now().date_naive());
        let records = expand_bulk_rows(data.member_id, date, &data.rows);
        let created = self.repository.checkouts.create_many(&records).await?;

        tracing::info!(member_id = %data.member_id, pieces = created.len(), "Bulk checkout");
        self.changes.publish(Collection::Checkouts);
        Ok(Ok(created))
    }

    /// Filtered check-out list as semicolon separated CSV
    pub async fn export_csv(&self, query: &CheckoutQuery) -> AppResult<String> {
        let details = self.list_checkouts(query).await?;
        checkouts_csv(&details).map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
    }

    async fn prepare(&self, data: &CreateCheckout, exclude: Option<Uuid>) -> AppResult<NewCheckout> {
        self.repository.members.get_by_id(data.member_id).await?;
        let item = self.repository.stock_items.get_by_id(data.stock_item_id).await?;

        let checked_out = self
            .repository
            .checkouts
            .count_for_item(item.id, exclude)
            .await?;
        if i64::from(item.total) - checked_out < 1 {
            return Err(AppError::BusinessRule(format!(
                "No pieces of \"{}\" available",
                item.name
            )));
        }

        Ok(NewCheckout {
            member_id: data.member_id,
            stock_item_id: item.id,
            tag: clean_tag(data.tag.as_deref()),
            checkout_date: data.checkout_date.unwrap_or_else(|| Utc::now().date_naive()),
        })
    }
}

fn availability(item: StockItem, checked_out: i64) -> StockItemAvailability {
    let available = i64::from(item.total) - checked_out;
    StockItemAvailability { item, checked_out, available }
}

/// Attach check-out counts to items
pub fn with_availability(items: Vec<StockItem>, counts: &HashMap<Uuid, i64>) -> Vec<StockItemAvailability> {
    items
        .into_iter()
        .map(|item| {
            let checked_out = counts.get(&item.id).copied().unwrap_or(0);
            availability(item, checked_out)
        })
        .collect()
}

/// Stock totals and the items with nothing left
pub fn summarize(items: Vec<StockItemAvailability>) -> StockSummary {
    let total_items = items.len();
    let total_pieces = items.iter().map(|a| i64::from(a.item.total)).sum();
    let total_available = items.iter().map(|a| a.available.max(0)).sum();
    let critical = items.into_iter().filter(|a| a.available <= 0).collect();

    StockSummary {
        total_items,
        total_pieces,
        total_available,
        critical,
    }
}

/// Check every row; requested quantities are summed per item before being
/// compared with availability.
pub fn validate_bulk_rows(rows: &[BulkCheckoutRow], available: &HashMap<Uuid, i64>) -> Result<(), Vec<RowError>> {
    let mut requested: HashMap<Uuid, i64> = HashMap::new();
    for row in rows {
        if let Some(id) = row.stock_item_id {
            *requested.entry(id).or_default() += i64::from(row.quantity.max(0));
        }
    }

    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let message = match row.stock_item_id {
            None => Some("Select a stock item".to_string()),
            Some(_) if row.quantity < 1 => Some("Quantity must be at least 1".to_string()),
            Some(id) => match available.get(&id) {
                None => Some("Unknown stock item".to_string()),
                Some(&free) => {
                    let wanted = requested.get(&id).copied().unwrap_or(0);
                    (wanted > free).then(|| format!("Requested {}, available {}", wanted, free))
                }
            },
        };
        if let Some(message) = message {
            errors.push(RowError { row: index, message });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// One record per requested piece
fn expand_bulk_rows(member_id: Uuid, date: NaiveDate, rows: &[BulkCheckoutRow]) -> Vec<NewCheckout> {
    rows.iter()
        .filter_map(|row| row.stock_item_id.map(|id| (id, row)))
        .flat_map(|(stock_item_id, row)| {
            let tag = clean_tag(row.tag.as_deref());
            (0..row.quantity.max(0)).map(move |_| NewCheckout {
                member_id,
                stock_item_id,
                tag: tag.clone(),
                checkout_date: date,
            })
        })
        .collect()
}

/// Join member and item names onto check-outs
pub fn with_names(checkouts: Vec<Checkout>, members: &[Member], items: &[StockItem]) -> Vec<CheckoutDetails> {
    let members: HashMap<Uuid, &Member> = members.iter().map(|m| (m.id, m)).collect();
    let items: HashMap<Uuid, &StockItem> = items.iter().map(|i| (i.id, i)).collect();

    checkouts
        .into_iter()
        .map(|checkout| CheckoutDetails {
            member_name: members
                .get(&checkout.member_id)
                .map(|m| m.sort_name())
                .unwrap_or_default(),
            item_name: items
                .get(&checkout.stock_item_id)
                .map(|i| i.name.clone())
                .unwrap_or_default(),
            checkout,
        })
        .collect()
}

/// Free-text filter over member names (both orders), item name, tag and
/// `YYYY-MM-DD` date
pub fn filter_details(details: Vec<CheckoutDetails>, q: &str, members: &[Member]) -> Vec<CheckoutDetails> {
    let needle = match clean_name(q) {
        Some(n) => n.to_lowercase(),
        None => return details,
    };
    let members: HashMap<Uuid, &Member> = members.iter().map(|m| (m.id, m)).collect();

    details
        .into_iter()
        .filter(|d| {
            let member_hit = members.get(&d.checkout.member_id).is_some_and(|m| {
                m.full_name().to_lowercase().contains(&needle)
                    || m.sort_name().to_lowercase().contains(&needle)
            });
            member_hit
                || d.item_name.to_lowercase().contains(&needle)
                || d.checkout
                    .tag
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
                || d.checkout.checkout_date.format("%Y-%m-%d").to_string().contains(&needle)
        })
        .collect()
}

/// Render check-outs as CSV (`;` separated, quoted only when needed)
///
/// A field is quoted when it holds `;`, `,`, `"` or a line break, so the
/// file opens the same in spreadsheets set to either separator.
pub fn checkouts_csv(details: &[CheckoutDetails]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(["Rbr", "Clan", "Artikl", "Oznaka", "Datum"])?;
    for (index, d) in details.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            quote_field(&d.member_name),
            quote_field(&d.item_name),
            quote_field(d.checkout.tag.as_deref().unwrap_or_default()),
            d.checkout.checkout_date.format("%Y-%m-%d").to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn quote_field(field: &str) -> String {
    if field.contains([';', ',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::MemberRole;

    fn item(name: &str, total: i32) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            total,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn member(first: &str, last: &str) -> Member {
        Member {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: MemberRole::Member,
            phone: None,
            email: None,
            birth_date: None,
            personal_id: None,
            medical_exam_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn checkout(member: &Member, item: &StockItem, tag: Option<&str>, date: (i32, u32, u32)) -> Checkout {
        Checkout {
            id: Uuid::new_v4(),
            member_id: member.id,
            stock_item_id: item.id,
            tag: tag.map(str::to_string),
            checkout_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn row(id: Option<Uuid>, quantity: i32) -> BulkCheckoutRow {
        BulkCheckoutRow { stock_item_id: id, quantity, tag: None }
    }

    #[test]
    fn test_availability_and_summary() {
        let helmets = item("Kaciga", 5);
        let boots = item("Čizme", 2);
        let counts: HashMap<Uuid, i64> = [(helmets.id, 2), (boots.id, 2)].into_iter().collect();

        let list = with_availability(vec![helmets.clone(), boots.clone()], &counts);
        assert_eq!(list[0].available, 3);
        assert_eq!(list[1].available, 0);

        let summary = summarize(list);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_pieces, 7);
        assert_eq!(summary.total_available, 3);
        assert_eq!(summary.critical.len(), 1);
        assert_eq!(summary.critical[0].item.id, boots.id);
    }

    #[test]
    fn test_item_without_checkouts_is_fully_available() {
        let list = with_availability(vec![item("Rukavice", 4)], &HashMap::new());
        assert_eq!(list[0].checked_out, 0);
        assert_eq!(list[0].available, 4);
    }

    #[test]
    fn test_validate_bulk_rows_sums_per_item() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let available: HashMap<Uuid, i64> = [(a, 3), (b, 5)].into_iter().collect();

        assert!(validate_bulk_rows(&[row(Some(a), 3), row(Some(b), 1)], &available).is_ok());

        let errors = validate_bulk_rows(&[row(Some(a), 2), row(Some(a), 2), row(Some(b), 1)], &available)
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], RowError { row: 0, message: "Requested 4, available 3".to_string() });
        assert_eq!(errors[1].row, 1);
    }

    #[test]
    fn test_validate_bulk_rows_required_fields() {
        let a = Uuid::new_v4();
        let available: HashMap<Uuid, i64> = [(a, 3)].into_iter().collect();

        let errors = validate_bulk_rows(
            &[row(None, 1), row(Some(a), 0), row(Some(Uuid::new_v4()), 1)],
            &available,
        )
        .unwrap_err();
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Select a stock item", "Quantity must be at least 1", "Unknown stock item"]
        );
    }

    #[test]
    fn test_expand_bulk_rows() {
        let (member_id, a, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let rows = vec![
            BulkCheckoutRow { stock_item_id: Some(a), quantity: 2, tag: Some(" 42 ".to_string()) },
            BulkCheckoutRow { stock_item_id: Some(b), quantity: 1, tag: Some("".to_string()) },
        ];

        let records = expand_bulk_rows(member_id, date, &rows);
        assert_eq!(records.len(), 3);
        assert!(records[..2].iter().all(|r| r.stock_item_id == a && r.tag.as_deref() == Some("42")));
        assert_eq!(records[2].tag, None);
        assert!(records.iter().all(|r| r.member_id == member_id && r.checkout_date == date));
    }

    #[test]
    fn test_filter_details() {
        let ivan = member("Ivan", "Horvat");
        let ana = member("Ana", "Kovač");
        let helmet = item("Kaciga", 5);
        let jacket = item("Jakna", 5);
        let members = vec![ivan.clone(), ana.clone()];

        let details = with_names(
            vec![
                checkout(&ivan, &helmet, Some("K-12"), (2025, 1, 10)),
                checkout(&ana, &jacket, None, (2024, 12, 1)),
            ],
            &members,
            &[helmet.clone(), jacket.clone()],
        );
        assert_eq!(details[0].member_name, "Horvat Ivan");

        assert_eq!(filter_details(details.clone(), "horvat iv", &members).len(), 1);
        assert_eq!(filter_details(details.clone(), "ana kov", &members).len(), 1);
        assert_eq!(filter_details(details.clone(), "k-12", &members).len(), 1);
        assert_eq!(filter_details(details.clone(), "2024-12", &members).len(), 1);
        assert_eq!(filter_details(details.clone(), "JAKNA", &members).len(), 1);
        assert_eq!(filter_details(details.clone(), "  ", &members).len(), 2);
        assert!(filter_details(details, "pumpa", &members).is_empty());
    }

    #[test]
    fn test_checkouts_csv() {
        let ivan = member("Ivan", "Horvat");
        let helmet = item("Kaciga; bijela", 5);
        let details = with_names(
            vec![
                checkout(&ivan, &helmet, Some("\"A\""), (2025, 1, 10)),
                checkout(&ivan, &helmet, None, (2025, 1, 9)),
            ],
            &[ivan.clone()],
            &[helmet],
        );

        let csv = checkouts_csv(&details).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Rbr;Clan;Artikl;Oznaka;Datum");
        assert_eq!(lines[1], "1;Horvat Ivan;\"Kaciga; bijela\";\"\"\"A\"\"\";2025-01-10");
        assert_eq!(lines[2], "2;Horvat Ivan;\"Kaciga; bijela\";;2025-01-09");
    }

    #[test]
    fn test_checkouts_csv_quotes_commas() {
        let ivan = member("Ivan", "Horvat");
        let helmet = item("Kaciga, bijela", 5);
        let details = with_names(
            vec![checkout(&ivan, &helmet, Some("K-12"), (2025, 1, 1))],
            &[ivan.clone()],
            &[helmet],
        );

        let csv = checkouts_csv(&details).unwrap();
        assert_eq!(
            csv.lines().nth(1),
            Some("1;Horvat Ivan;\"Kaciga, bijela\";K-12;2025-01-01")
        );
        assert_eq!(quote_field("dva\nreda"), "\"dva\nreda\"");
        assert_eq!(quote_field("obicno"), "obicno");
    }
}
