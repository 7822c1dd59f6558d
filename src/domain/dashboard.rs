//! Aggregate figures shown on the dashboard.
//!
//! The repository fills a [`DashboardSnapshot`] with grouped counts and sums;
//! [`Dashboard::from_snapshot`] shapes them into the response.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::types::{
    ContractStatus, EntryStatus, MeetingKind, MeetingStatus, PersonKind, PhaseStatus,
    ProjectStatus,
};

/// Days covered by the "recent" and "upcoming" counters.
pub const ACTIVITY_DAYS: u64 = 7;

/// Date bounds for the activity counters, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivityWindow {
    pub today: NaiveDate,
    pub recent_since: NaiveDate,
    pub upcoming_until: NaiveDate,
}

impl ActivityWindow {
    pub fn around(today: NaiveDate) -> Self {
        Self {
            today,
            recent_since: today - Days::new(ACTIVITY_DAYS),
            upcoming_until: today + Days::new(ACTIVITY_DAYS),
        }
    }
}

/// Grouped counts and sums as read from the store. `*_by_*` lists pair a
/// stored token with its row count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub clients_by_kind: Vec<(String, usize)>,
    pub active_clients: usize,
    pub projects_by_status: Vec<(String, usize)>,
    pub contracts_by_status: Vec<(String, usize)>,
    pub contract_value: f64,
    pub entries_by_status: Vec<(String, usize)>,
    pub income: f64,
    pub expenses: f64,
    pub meetings_by_status: Vec<(String, usize)>,
    pub meetings_by_kind: Vec<(String, usize)>,
    pub phases_by_status: Vec<(String, usize)>,
    /// Open phases whose planned end is before today.
    pub late_phases: usize,
    pub new_clients: usize,
    pub new_projects: usize,
    pub recent_meetings_held: usize,
    pub upcoming_meetings: usize,
    /// Open entries due between today and the end of the window.
    pub entries_due_soon: usize,
}

/// Total plus one counter per known token, zero when absent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tally {
    pub total: usize,
    #[serde(flatten)]
    pub by_token: BTreeMap<&'static str, usize>,
}

impl Tally {
    pub fn new(tokens: &[&'static str], rows: &[(String, usize)]) -> Self {
        let mut by_token: BTreeMap<&'static str, usize> =
            tokens.iter().map(|token| (*token, 0)).collect();
        let mut total = 0;
        for (token, count) in rows {
            total += count;
            if let Some(known) = tokens.iter().find(|known| **known == token.as_str()) {
                *by_token.entry(*known).or_default() += count;
            }
        }
        Self { total, by_token }
    }

    pub fn get(&self, token: &str) -> usize {
        self.by_token.get(token).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientMetrics {
    pub total: usize,
    pub ativos: usize,
    pub inativos: usize,
    pub pj: usize,
    pub pf: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectMetrics {
    #[serde(flatten)]
    pub status: Tally,
    /// Share of finished projects, rounded to a whole percent.
    pub percentual_concluido: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContractMetrics {
    #[serde(flatten)]
    pub status: Tally,
    pub valor_total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FinancialMetrics {
    #[serde(flatten)]
    pub status: Tally,
    pub valor_entradas: f64,
    pub valor_saidas: f64,
    pub saldo: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeetingMetrics {
    #[serde(flatten)]
    pub status: Tally,
    #[serde(flatten)]
    pub tipo: BTreeMap<&'static str, usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleMetrics {
    #[serde(flatten)]
    pub status: Tally,
    pub atrasados: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub clientes: ClientMetrics,
    pub projetos: ProjectMetrics,
    pub contratos: ContractMetrics,
    pub financeiro: FinancialMetrics,
    pub reunioes: MeetingMetrics,
    pub cronograma: ScheduleMetrics,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentActivity {
    pub novos_clientes: usize,
    pub novos_projetos: usize,
    pub reunioes_realizadas: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpcomingActivity {
    pub reunioes_agendadas: usize,
    pub contas_vencendo: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_clientes: usize,
    pub projetos_ativos: usize,
    pub valor_contratos: f64,
    pub saldo_financeiro: f64,
    pub reunioes_esta_semana: usize,
    pub fases_atrasadas: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub metricas: Metrics,
    pub atividades_recentes: RecentActivity,
    pub proximas_atividades: UpcomingActivity,
    pub resumo: Summary,
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

impl Dashboard {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        let kinds = Tally::new(PersonKind::TOKENS, &snapshot.clients_by_kind);
        let clientes = ClientMetrics {
            total: kinds.total,
            ativos: snapshot.active_clients,
            inativos: kinds.total.saturating_sub(snapshot.active_clients),
            pj: kinds.get(PersonKind::Company.as_str()),
            pf: kinds.get(PersonKind::Individual.as_str()),
        };

        let project_status = Tally::new(ProjectStatus::TOKENS, &snapshot.projects_by_status);
        let projetos = ProjectMetrics {
            percentual_concluido: percent(
                project_status.get(ProjectStatus::Finished.as_str()),
                project_status.total,
            ),
            status: project_status,
        };

        let contratos = ContractMetrics {
            status: Tally::new(ContractStatus::TOKENS, &snapshot.contracts_by_status),
            valor_total: snapshot.contract_value,
        };

        let financeiro = FinancialMetrics {
            status: Tally::new(EntryStatus::TOKENS, &snapshot.entries_by_status),
            valor_entradas: snapshot.income,
            valor_saidas: snapshot.expenses,
            saldo: snapshot.income - snapshot.expenses,
        };

        let reunioes = MeetingMetrics {
            status: Tally::new(MeetingStatus::TOKENS, &snapshot.meetings_by_status),
            tipo: Tally::new(MeetingKind::TOKENS, &snapshot.meetings_by_kind).by_token,
        };

        let cronograma = ScheduleMetrics {
            status: Tally::new(PhaseStatus::TOKENS, &snapshot.phases_by_status),
            atrasados: snapshot.late_phases,
        };

        let resumo = Summary {
            total_clientes: clientes.total,
            projetos_ativos: projetos.status.get(ProjectStatus::InProgress.as_str()),
            valor_contratos: contratos.valor_total,
            saldo_financeiro: financeiro.saldo,
            reunioes_esta_semana: snapshot.upcoming_meetings,
            fases_atrasadas: snapshot.late_phases,
        };

        Self {
            metricas: Metrics {
                clientes,
                projetos,
                contratos,
                financeiro,
                reunioes,
                cronograma,
            },
            atividades_recentes: RecentActivity {
                novos_clientes: snapshot.new_clients,
                novos_projetos: snapshot.new_projects,
                reunioes_realizadas: snapshot.recent_meetings_held,
            },
            proximas_atividades: UpcomingActivity {
                reunioes_agendadas: snapshot.upcoming_meetings,
                contas_vencendo: snapshot.entries_due_soon,
            },
            resumo,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn counts(rows: &[(&str, usize)]) -> Vec<(String, usize)> {
        rows.iter().map(|(token, n)| (token.to_string(), *n)).collect()
    }

    #[test]
    fn tally_zero_fills_known_tokens() {
        let tally = Tally::new(ContractStatus::TOKENS, &counts(&[("ativo", 3), ("legado", 1)]));
        assert_eq!(tally.total, 4);
        assert_eq!(
            serde_json::to_value(&tally).unwrap(),
            json!({"total": 4, "ativo": 3, "concluido": 0, "cancelado": 0})
        );
    }

    #[test]
    fn window_spans_a_week_each_way() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let window = ActivityWindow::around(today);
        assert_eq!(window.recent_since, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(window.upcoming_until, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
    }

    #[test]
    fn snapshot_shapes_metrics_and_summary() {
        let snapshot = DashboardSnapshot {
            clients_by_kind: counts(&[("PJ", 3), ("PF", 1)]),
            active_clients: 3,
            projects_by_status: counts(&[("em_andamento", 2), ("concluido", 1)]),
            contract_value: 4500.0,
            income: 3000.0,
            expenses: 750.5,
            meetings_by_kind: counts(&[("online", 2)]),
            late_phases: 1,
            upcoming_meetings: 2,
            ..DashboardSnapshot::default()
        };

        let dashboard = Dashboard::from_snapshot(&snapshot);
        let clientes = &dashboard.metricas.clientes;

        assert_eq!((clientes.total, clientes.inativos, clientes.pj, clientes.pf), (4, 1, 3, 1));
        assert_eq!(dashboard.metricas.projetos.percentual_concluido, 33);
        assert_eq!(dashboard.metricas.reunioes.tipo.get("online"), Some(&2));
        assert_eq!(dashboard.metricas.reunioes.tipo.get("hibrida"), Some(&0));

        let value = serde_json::to_value(&dashboard.resumo).unwrap();
        assert_eq!(
            value,
            json!({
                "total_clientes": 4,
                "projetos_ativos": 2,
                "valor_contratos": 4500.0,
                "saldo_financeiro": 2249.5,
                "reunioes_esta_semana": 2,
                "fases_atrasadas": 1
            })
        );
    }
}
