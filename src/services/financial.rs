//! Financial entries: instalments received and expenses paid under a
//! contract, plus the receivables view.

use chrono::NaiveDate;
use serde_json::Value;

use crate::denormalize::Projection;
use crate::domain::financial::{FinancialEntry, NewFinancialEntry};
use crate::domain::types::{ContractId, EntryKind, EntryStatus, FinancialEntryId};
use crate::forms::financial::{FinancialEntryForm, PaymentForm};
use crate::pagination::Paginated;
use crate::query::{FilterRule, FilterSet, Predicate, QueryDescriptor, QuerySpec, SortKey};
use crate::repository::{ContractReader, FinancialReader, FinancialWriter};
use crate::services::contract::CONTRACT_NOT_FOUND;
use crate::services::{
    ServiceError, ServiceResult, flatten_row, flatten_rows, page_request, path_id,
    repository_failure, validated,
};

pub const ENTRY_NOT_FOUND: &str = "Movimento não encontrado";

pub const ENTRY_QUERY: QuerySpec = QuerySpec {
    rules: &[
        FilterRule::Equals {
            param: "tipo_movimento",
            field: "tipo_movimento",
        },
        FilterRule::Equals {
            param: "status",
            field: "status",
        },
        FilterRule::Equals {
            param: "contrato_id",
            field: "contrato_id",
        },
        FilterRule::From {
            param: "data_inicio",
            field: "data_vencimento",
        },
        FilterRule::Until {
            param: "data_fim",
            field: "data_vencimento",
        },
    ],
    sort: &[SortKey::desc("data_vencimento"), SortKey::desc("id")],
};

const RECEIVABLES_SORT: &[SortKey] = &[SortKey::asc("data_vencimento"), SortKey::asc("id")];

pub const ENTRY_FIELDS: &[Projection] = &[
    Projection::new("numero_contrato", &["contratos.numero_contrato"]),
    Projection::new("valor_contrato", &["contratos.valor_contrato"]),
    Projection::new("projeto_nome", &["contratos.projetos.nome"]),
    Projection::new("nome_empresa", &["contratos.clientes.nome_empresa"]),
    Projection::new("nome_completo", &["contratos.clientes.nome_completo"]),
];

pub fn list_entries<R>(repo: &R, filters: &FilterSet) -> ServiceResult<Paginated<Value>>
where
    R: FinancialReader + ?Sized,
{
    let page = page_request(filters)?;
    let query = ENTRY_QUERY.build(filters).paginate(page.window());

    let (total, entries) = repo
        .list_entries(&query)
        .map_err(repository_failure("Failed to list financial entries", ENTRY_NOT_FOUND))?;

    Ok(Paginated::new(
        flatten_rows(&entries, ENTRY_FIELDS)?,
        page,
        total,
    ))
}

pub fn get_entry<R>(repo: &R, entry_id: i32) -> ServiceResult<Value>
where
    R: FinancialReader + ?Sized,
{
    let entry_id: FinancialEntryId = path_id(entry_id, ENTRY_NOT_FOUND)?;

    let entry = repo
        .get_entry_by_id(entry_id)
        .map_err(repository_failure("Failed to load financial entry", ENTRY_NOT_FOUND))?
        .ok_or_else(|| ServiceError::NotFound(ENTRY_NOT_FOUND.to_string()))?;

    flatten_row(&entry, ENTRY_FIELDS)
}

fn ensure_contract<R>(repo: &R, contract_id: ContractId) -> ServiceResult<()>
where
    R: ContractReader + ?Sized,
{
    repo.get_contract_by_id(contract_id)
        .map_err(repository_failure("Failed to load contract", CONTRACT_NOT_FOUND))?
        .map(|_| ())
        .ok_or_else(|| ServiceError::InvalidReference(CONTRACT_NOT_FOUND.to_string()))
}

pub fn create_entry<R>(repo: &R, form: FinancialEntryForm) -> ServiceResult<FinancialEntry>
where
    R: FinancialWriter + ContractReader + ?Sized,
{
    let entry = NewFinancialEntry::from(validated(form)?);
    ensure_contract(repo, entry.contrato_id)?;

    repo.create_entry(&entry)
        .map_err(repository_failure("Failed to create financial entry", ENTRY_NOT_FOUND))
}

pub fn update_entry<R>(
    repo: &R,
    entry_id: i32,
    form: FinancialEntryForm,
) -> ServiceResult<FinancialEntry>
where
    R: FinancialWriter + ContractReader + ?Sized,
{
    let entry = NewFinancialEntry::from(validated(form)?);
    let entry_id: FinancialEntryId = path_id(entry_id, ENTRY_NOT_FOUND)?;
    ensure_contract(repo, entry.contrato_id)?;

    repo.update_entry(entry_id, &entry)
        .map_err(repository_failure("Failed to update financial entry", ENTRY_NOT_FOUND))
}

/// Marks the entry paid, dated `today` unless the form names a date.
pub fn pay_entry<R>(
    repo: &R,
    entry_id: i32,
    form: PaymentForm,
    today: NaiveDate,
) -> ServiceResult<FinancialEntry>
where
    R: FinancialWriter + ?Sized,
{
    let payment = validated(form)?.into_payment(today);
    let entry_id: FinancialEntryId = path_id(entry_id, ENTRY_NOT_FOUND)?;

    repo.mark_entry_paid(entry_id, &payment)
        .map_err(repository_failure("Failed to mark entry as paid", ENTRY_NOT_FOUND))
}

pub fn delete_entry<R>(repo: &R, entry_id: i32) -> ServiceResult<()>
where
    R: FinancialWriter + ?Sized,
{
    let entry_id: FinancialEntryId = path_id(entry_id, ENTRY_NOT_FOUND)?;

    repo.delete_entry(entry_id)
        .map_err(repository_failure("Failed to delete financial entry", ENTRY_NOT_FOUND))
}

/// Incoming entries in `status` (default open), soonest due first. With
/// `vencidas=true` only entries already past due are kept. Each row carries
/// `dias_vencimento`, the signed number of days from `today` to its due date.
pub fn list_receivables<R>(
    repo: &R,
    filters: &FilterSet,
    today: NaiveDate,
) -> ServiceResult<Vec<Value>>
where
    R: FinancialReader + ?Sized,
{
    let status = filters
        .get("status")
        .unwrap_or(EntryStatus::Open.as_str());

    let mut query = QueryDescriptor::new(RECEIVABLES_SORT)
        .with(Predicate::Equals {
            field: "tipo_movimento",
            value: EntryKind::Income.as_str().to_string(),
        })
        .with(Predicate::Equals {
            field: "status",
            value: status.to_string(),
        });
    if filters.get("vencidas") == Some("true") {
        query = query.with(Predicate::Before {
            field: "data_vencimento",
            value: today.to_string(),
        });
    }

    let (_, entries) = repo
        .list_entries(&query)
        .map_err(repository_failure("Failed to list receivables", ENTRY_NOT_FOUND))?;

    entries
        .iter()
        .map(|listing| {
            let mut row = flatten_row(listing, ENTRY_FIELDS)?;
            if let Some(fields) = row.as_object_mut() {
                fields.insert(
                    "dias_vencimento".to_string(),
                    listing.entry.days_until_due(today).into(),
                );
            }
            Ok(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::domain::contract::{ContractListing, ContractSummary};
    use crate::domain::financial::FinancialListing;
    use crate::domain::types::PaymentMethod;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{client_summary, contract, date, project_summary};

    fn entry(id: i32, due: Option<NaiveDate>) -> FinancialEntry {
        let now = Utc::now().naive_utc();
        FinancialEntry {
            id: FinancialEntryId::new(id).unwrap(),
            contrato_id: ContractId::new(1).unwrap(),
            tipo_movimento: EntryKind::Income,
            descricao: format!("Parcela {id}"),
            valor: 500.0,
            forma_pagamento: None,
            data_vencimento: due,
            data_pagamento: None,
            status: EntryStatus::Open,
            numero_parcela: Some(id),
            observacoes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn listing(id: i32, due: Option<NaiveDate>) -> FinancialListing {
        FinancialListing {
            entry: entry(id, due),
            contratos: Some(ContractSummary {
                numero_contrato: 12,
                valor_contrato: 1500.0,
                projetos: Some(project_summary()),
                clientes: Some(client_summary()),
            }),
        }
    }

    fn form() -> FinancialEntryForm {
        serde_json::from_value(json!({
            "contrato_id": 1,
            "tipo_movimento": "entrada",
            "descricao": "Parcela 1",
            "valor": 500.0,
            "data_vencimento": "2025-03-10"
        }))
        .unwrap()
    }

    /// Contract, project and client fields come out two levels deep.
    #[test]
    fn list_flattens_contract_chain() {
        let mut repo = MockRepository::new();
        repo.expect_list_entries()
            .returning(|_| Ok((1, vec![listing(1, None)])));

        let page = list_entries(&repo, &FilterSet::default()).unwrap();
        let row = &page.items[0];

        assert_eq!(row["numero_contrato"], json!(12));
        assert_eq!(row["valor_contrato"], json!(1500.0));
        assert_eq!(row["projeto_nome"], json!("Portal do cliente"));
        assert_eq!(row["nome_empresa"], json!("ACME Ltda"));
        assert_eq!(row["nome_completo"], json!(null));
    }

    #[test]
    fn date_range_filters_become_bounds() {
        let mut repo = MockRepository::new();
        repo.expect_list_entries()
            .withf(|query| {
                query.predicates()
                    == [
                        Predicate::AtLeast {
                            field: "data_vencimento",
                            value: "2025-01-01".to_string(),
                        },
                        Predicate::AtMost {
                            field: "data_vencimento",
                            value: "2025-01-31".to_string(),
                        },
                    ]
            })
            .returning(|_| Ok((0, vec![])));

        let filters: FilterSet = [("data_inicio", "2025-01-01"), ("data_fim", "2025-01-31")]
            .into_iter()
            .collect();
        let page = list_entries(&repo, &filters).unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.meta.pages, 0);
    }

    #[test]
    fn create_requires_existing_contract() {
        let mut repo = MockRepository::new();
        repo.expect_get_contract_by_id().returning(|_| Ok(None));
        repo.expect_create_entry().times(0);

        assert!(matches!(
            create_entry(&repo, form()),
            Err(ServiceError::InvalidReference(ref msg)) if msg == CONTRACT_NOT_FOUND
        ));
    }

    #[test]
    fn create_stores_entry() {
        let mut repo = MockRepository::new();
        repo.expect_get_contract_by_id().returning(|_| {
            Ok(Some(ContractListing {
                contract: contract(1),
                clientes: None,
                projetos: None,
            }))
        });
        repo.expect_create_entry()
            .times(1)
            .returning(|_| Ok(entry(3, Some(date(2025, 3, 10)))));

        let created = create_entry(&repo, form()).unwrap();

        assert_eq!(created.id.get(), 3);
    }

    /// Payment date defaults to today when the body omits it.
    #[test]
    fn pay_defaults_to_today() {
        let today = date(2025, 3, 10);
        let mut repo = MockRepository::new();
        repo.expect_mark_entry_paid()
            .withf(move |_, payment| {
                payment.data_pagamento == today
                    && payment.forma_pagamento == Some(PaymentMethod::Pix)
            })
            .times(1)
            .returning(|id, payment| {
                let mut paid = entry(id.get(), None);
                paid.status = EntryStatus::Paid;
                paid.data_pagamento = Some(payment.data_pagamento);
                Ok(paid)
            });

        let form: PaymentForm = serde_json::from_value(json!({"forma_pagamento": "pix"})).unwrap();
        let paid = pay_entry(&repo, 4, form, today).unwrap();

        assert_eq!(paid.status, EntryStatus::Paid);
        assert_eq!(paid.data_pagamento, Some(today));
    }

    #[test]
    fn pay_missing_entry_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_mark_entry_paid()
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            pay_entry(&repo, 4, PaymentForm::default(), date(2025, 3, 10)),
            Err(ServiceError::NotFound(ref msg)) if msg == ENTRY_NOT_FOUND
        ));
    }

    #[test]
    fn receivables_default_to_open_income_sorted_ascending() {
        let mut repo = MockRepository::new();
        repo.expect_list_entries()
            .withf(|query| {
                query.window().is_none()
                    && query.sort() == RECEIVABLES_SORT
                    && query.predicates()
                        == [
                            Predicate::Equals {
                                field: "tipo_movimento",
                                value: "entrada".to_string(),
                            },
                            Predicate::Equals {
                                field: "status",
                                value: "em_aberto".to_string(),
                            },
                        ]
            })
            .returning(|_| {
                Ok((
                    2,
                    vec![
                        listing(1, Some(date(2025, 3, 1))),
                        listing(2, None),
                    ],
                ))
            });

        let rows = list_receivables(&repo, &FilterSet::default(), date(2025, 3, 10)).unwrap();

        assert_eq!(rows[0]["dias_vencimento"], json!(-9));
        assert_eq!(rows[0]["nome_empresa"], json!("ACME Ltda"));
        assert_eq!(rows[1]["dias_vencimento"], json!(null));
    }

    #[test]
    fn overdue_receivables_are_strictly_before_today() {
        let mut repo = MockRepository::new();
        repo.expect_list_entries()
            .withf(|query| {
                query.predicates().last()
                    == Some(&Predicate::Before {
                        field: "data_vencimento",
                        value: "2025-03-10".to_string(),
                    })
            })
            .returning(|_| Ok((0, vec![])));

        let filters: FilterSet = [("vencidas", "true")].into_iter().collect();
        let rows = list_receivables(&repo, &filters, date(2025, 3, 10)).unwrap();

        assert!(rows.is_empty());
    }
}
