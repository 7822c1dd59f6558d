//! Project schedule phases, progress tracking and the Gantt feed.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::denormalize::Projection;
use crate::domain::schedule::{GanttBar, NewSchedulePhase, Progress, ScheduleListing, SchedulePhase};
use crate::domain::types::{PhaseId, ProjectId};
use crate::forms::schedule::{ProgressForm, ScheduleForm};
use crate::pagination::Paginated;
use crate::query::{FilterRule, FilterSet, Predicate, QueryDescriptor, QuerySpec, SortKey};
use crate::repository::{ProjectReader, ScheduleReader, ScheduleWriter};
use crate::services::project::PROJECT_NOT_FOUND;
use crate::services::{
    ServiceError, ServiceResult, ensure_project, flatten_row, page_request, path_id,
    repository_failure, validated,
};

pub const PHASE_NOT_FOUND: &str = "Cronograma não encontrado";

pub const SCHEDULE_QUERY: QuerySpec = QuerySpec {
    rules: &[
        FilterRule::Equals {
            param: "projeto_id",
            field: "projeto_id",
        },
        FilterRule::Equals {
            param: "status",
            field: "status",
        },
        FilterRule::Search {
            param: "fase",
            fields: &["fase"],
        },
    ],
    sort: &[SortKey::asc("data_inicio"), SortKey::asc("id")],
};

pub const SCHEDULE_FIELDS: &[Projection] = &[
    Projection::new("projeto_nome", &["projetos.nome"]),
    Projection::new("nome_empresa", &["projetos.clientes.nome_empresa"]),
    Projection::new("nome_completo", &["projetos.clientes.nome_completo"]),
];

/// Flattens a listing with its status as of `today` and both durations.
fn schedule_row(mut listing: ScheduleListing, today: NaiveDate) -> ServiceResult<Value> {
    let planned = listing.phase.planned_days();
    let actual = listing.phase.actual_days();
    listing.phase.status = listing.phase.effective_status(today);

    let mut row = flatten_row(&listing, SCHEDULE_FIELDS)?;
    if let Value::Object(fields) = &mut row {
        fields.insert("duracao_planejada".to_string(), json!(planned));
        fields.insert("duracao_real".to_string(), json!(actual));
    }
    Ok(row)
}

pub fn list_phases<R>(
    repo: &R,
    filters: &FilterSet,
    today: NaiveDate,
) -> ServiceResult<Paginated<Value>>
where
    R: ScheduleReader + ?Sized,
{
    let page = page_request(filters)?;
    let query = SCHEDULE_QUERY.build(filters).paginate(page.window());

    let (total, phases) = repo
        .list_phases(&query)
        .map_err(repository_failure("Failed to list schedule", PHASE_NOT_FOUND))?;

    let rows = phases
        .into_iter()
        .map(|listing| schedule_row(listing, today))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Paginated::new(rows, page, total))
}

pub fn get_phase<R>(repo: &R, phase_id: i32, today: NaiveDate) -> ServiceResult<Value>
where
    R: ScheduleReader + ?Sized,
{
    let phase_id: PhaseId = path_id(phase_id, PHASE_NOT_FOUND)?;

    let listing = repo
        .get_phase_by_id(phase_id)
        .map_err(repository_failure("Failed to load schedule phase", PHASE_NOT_FOUND))?
        .ok_or_else(|| ServiceError::NotFound(PHASE_NOT_FOUND.to_string()))?;

    schedule_row(listing, today)
}

fn load_phase<R>(repo: &R, phase_id: PhaseId) -> ServiceResult<SchedulePhase>
where
    R: ScheduleReader + ?Sized,
{
    repo.get_phase_by_id(phase_id)
        .map_err(repository_failure("Failed to load schedule phase", PHASE_NOT_FOUND))?
        .map(|listing| listing.phase)
        .ok_or_else(|| ServiceError::NotFound(PHASE_NOT_FOUND.to_string()))
}

pub fn create_phase<R>(repo: &R, form: ScheduleForm) -> ServiceResult<SchedulePhase>
where
    R: ScheduleWriter + ProjectReader + ?Sized,
{
    let phase = NewSchedulePhase::from(validated(form)?);
    ensure_project(repo, phase.projeto_id)?;

    repo.create_phase(&phase)
        .map_err(repository_failure("Failed to create schedule phase", PHASE_NOT_FOUND))
}

pub fn update_phase<R>(repo: &R, phase_id: i32, form: ScheduleForm) -> ServiceResult<SchedulePhase>
where
    R: ScheduleWriter + ProjectReader + ?Sized,
{
    let phase = NewSchedulePhase::from(validated(form)?);
    let phase_id: PhaseId = path_id(phase_id, PHASE_NOT_FOUND)?;
    ensure_project(repo, phase.projeto_id)?;

    repo.update_phase(phase_id, &phase)
        .map_err(repository_failure("Failed to update schedule phase", PHASE_NOT_FOUND))
}

/// Sets the completion percentage and derives the status from it.
pub fn update_progress<R>(
    repo: &R,
    phase_id: i32,
    form: ProgressForm,
    today: NaiveDate,
) -> ServiceResult<SchedulePhase>
where
    R: ScheduleReader + ScheduleWriter + ?Sized,
{
    let form = validated(form)?;
    let phase_id: PhaseId = path_id(phase_id, PHASE_NOT_FOUND)?;
    let current = load_phase(repo, phase_id)?;

    let progress = Progress::record(&current, form.percentual_concluido, today);
    log::debug!(
        "Phase {phase_id} progress {} -> {}",
        current.percentual_concluido,
        progress.percentual_concluido
    );

    repo.record_progress(phase_id, &progress)
        .map_err(repository_failure("Failed to record progress", PHASE_NOT_FOUND))
}

pub fn delete_phase<R>(repo: &R, phase_id: i32) -> ServiceResult<()>
where
    R: ScheduleWriter + ?Sized,
{
    let phase_id: PhaseId = path_id(phase_id, PHASE_NOT_FOUND)?;

    repo.delete_phase(phase_id)
        .map_err(repository_failure("Failed to delete schedule phase", PHASE_NOT_FOUND))
}

/// Every phase of the project in start order, shaped for a Gantt chart.
/// An unknown project yields an empty chart.
pub fn gantt<R>(repo: &R, project_id: i32) -> ServiceResult<Vec<GanttBar>>
where
    R: ScheduleReader + ?Sized,
{
    let project_id: ProjectId = path_id(project_id, PROJECT_NOT_FOUND)?;

    let query = QueryDescriptor::new(SCHEDULE_QUERY.sort).with(Predicate::Equals {
        field: "projeto_id",
        value: project_id.to_string(),
    });

    let (_, phases) = repo
        .list_phases(&query)
        .map_err(repository_failure("Failed to load Gantt data", PHASE_NOT_FOUND))?;

    Ok(phases
        .into_iter()
        .map(|listing| GanttBar::from(listing.phase))
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::PhaseStatus;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{client_summary, date, project_listing, project_summary};

    fn phase(id: i32, status: PhaseStatus) -> SchedulePhase {
        let now = Utc::now().naive_utc();
        SchedulePhase {
            id: PhaseId::new(id).unwrap(),
            projeto_id: ProjectId::new(1).unwrap(),
            fase: "Desenvolvimento".to_string(),
            descricao: None,
            data_inicio: date(2025, 3, 1),
            data_fim: date(2025, 3, 31),
            data_inicio_real: Some(date(2025, 3, 3)),
            data_fim_real: None,
            percentual_concluido: 40,
            status,
            responsavel: Some("Ana".to_string()),
            dependencias: Some("1,2".to_string()),
            observacoes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn listing(id: i32, status: PhaseStatus) -> ScheduleListing {
        ScheduleListing {
            phase: phase(id, status),
            projetos: Some(project_summary()),
        }
    }

    fn form(data_fim: &str) -> ScheduleForm {
        serde_json::from_value(json!({
            "projeto_id": 1,
            "fase": "Desenvolvimento",
            "data_inicio": "2025-03-01",
            "data_fim": data_fim
        }))
        .unwrap()
    }

    #[test]
    fn list_reports_late_phases_and_durations() {
        let mut repo = MockRepository::new();
        repo.expect_list_phases()
            .withf(|query| query.sort() == SCHEDULE_QUERY.sort)
            .returning(|_| Ok((1, vec![listing(1, PhaseStatus::InProgress)])));

        let page = list_phases(&repo, &FilterSet::default(), date(2025, 4, 2)).unwrap();
        let row = &page.items[0];

        assert_eq!(row["status"], json!("atrasado"));
        assert_eq!(row["duracao_planejada"], json!(30));
        assert_eq!(row["duracao_real"], json!(null));
        assert_eq!(row["projeto_nome"], json!("Portal do cliente"));
        assert_eq!(row["nome_empresa"], json!("ACME Ltda"));
    }

    #[test]
    fn finished_phase_keeps_its_status() {
        let mut repo = MockRepository::new();
        repo.expect_get_phase_by_id()
            .returning(|id| Ok(Some(listing(id.get(), PhaseStatus::Finished))));

        let row = get_phase(&repo, 3, date(2025, 6, 1)).unwrap();

        assert_eq!(row["id"], json!(3));
        assert_eq!(row["status"], json!("concluido"));
    }

    #[test]
    fn missing_phase_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_phase_by_id().returning(|_| Ok(None));

        assert!(matches!(
            get_phase(&repo, 9, date(2025, 3, 1)),
            Err(ServiceError::NotFound(ref msg)) if msg == PHASE_NOT_FOUND
        ));
        assert!(matches!(
            get_phase(&repo, 0, date(2025, 3, 1)),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn end_before_start_is_rejected_before_lookup() {
        let mut repo = MockRepository::new();
        repo.expect_get_project_by_id().times(0);
        repo.expect_create_phase().times(0);

        match create_phase(&repo, form("2025-02-01")) {
            Err(ServiceError::Validation { details, .. }) => {
                assert_eq!(
                    details,
                    vec!["Data de fim deve ser posterior à data de início".to_string()]
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn create_requires_existing_project() {
        let mut repo = MockRepository::new();
        repo.expect_get_project_by_id().returning(|_| Ok(None));
        repo.expect_create_phase().times(0);

        assert!(matches!(
            create_phase(&repo, form("2025-03-31")),
            Err(ServiceError::InvalidReference(ref msg)) if msg == PROJECT_NOT_FOUND
        ));
    }

    #[test]
    fn create_stores_the_phase() {
        let mut repo = MockRepository::new();
        repo.expect_get_project_by_id()
            .returning(|id| Ok(Some(project_listing(id.get(), Some(client_summary())))));
        repo.expect_create_phase()
            .withf(|new| new.status == PhaseStatus::NotStarted && new.percentual_concluido == 0)
            .times(1)
            .returning(|_| Ok(phase(4, PhaseStatus::NotStarted)));

        let created = create_phase(&repo, form("2025-03-31")).unwrap();

        assert_eq!(created.id.get(), 4);
    }

    #[test]
    fn progress_completion_stamps_the_end_date() {
        let mut repo = MockRepository::new();
        repo.expect_get_phase_by_id()
            .returning(|id| Ok(Some(listing(id.get(), PhaseStatus::InProgress))));
        repo.expect_record_progress()
            .withf(|_, progress| {
                progress.status == PhaseStatus::Finished
                    && progress.data_inicio_real.is_none()
                    && progress.data_fim_real == Some(date(2025, 3, 28))
            })
            .times(1)
            .returning(|id, _| Ok(phase(id.get(), PhaseStatus::Finished)));

        let form = ProgressForm {
            percentual_concluido: 100,
        };
        let updated = update_progress(&repo, 1, form, date(2025, 3, 28)).unwrap();

        assert_eq!(updated.status, PhaseStatus::Finished);
    }

    #[test]
    fn progress_out_of_range_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_phase_by_id().times(0);
        repo.expect_record_progress().times(0);

        let form = ProgressForm {
            percentual_concluido: 101,
        };

        assert!(matches!(
            update_progress(&repo, 1, form, date(2025, 3, 28)),
            Err(ServiceError::Validation { .. })
        ));
    }

    #[test]
    fn progress_on_missing_phase_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_phase_by_id().returning(|_| Ok(None));
        repo.expect_record_progress().times(0);

        let form = ProgressForm {
            percentual_concluido: 50,
        };

        assert!(matches!(
            update_progress(&repo, 7, form, date(2025, 3, 28)),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn delete_missing_phase_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_phase()
            .returning(|_| Err(RepositoryError::NotFound));

        assert!(matches!(
            delete_phase(&repo, 3),
            Err(ServiceError::NotFound(ref msg)) if msg == PHASE_NOT_FOUND
        ));
    }

    #[test]
    fn gantt_lists_every_phase_of_the_project() {
        let mut repo = MockRepository::new();
        repo.expect_list_phases()
            .withf(|query| {
                query.window().is_none()
                    && query.predicates()
                        == [Predicate::Equals {
                            field: "projeto_id",
                            value: "1".to_string(),
                        }]
            })
            .returning(|_| {
                Ok((
                    2,
                    vec![
                        listing(1, PhaseStatus::Finished),
                        listing(2, PhaseStatus::InProgress),
                    ],
                ))
            });

        let bars = gantt(&repo, 1).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].name, "Desenvolvimento");
        assert_eq!(bars[1].progress, 40);
        assert_eq!(bars[1].dependencies, ["1", "2"]);
    }
}
