//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::{Client, NewClient};
use crate::domain::contract::{Contract, ContractListing, NewContract};
use crate::domain::dashboard::{ActivityWindow, DashboardSnapshot};
use crate::domain::financial::{FinancialEntry, FinancialListing, NewFinancialEntry, Payment};
use crate::domain::meeting::{Meeting, MeetingListing, NewMeeting};
use crate::domain::project::{NewProject, Project, ProjectListing};
use crate::domain::schedule::{NewSchedulePhase, Progress, ScheduleListing, SchedulePhase};
use crate::domain::types::{
    ClientId, ContractId, FinancialEntryId, MeetingId, PhaseId, ProjectId,
};
use crate::query::QueryDescriptor;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientReader, ClientWriter, ContractReader, ContractWriter, DashboardReader, FinancialReader,
    FinancialWriter, MeetingReader, MeetingWriter, ProjectReader, ProjectWriter, ScheduleReader,
    ScheduleWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: &QueryDescriptor) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(&self, id: ClientId, client: &NewClient) -> RepositoryResult<Client>;
        fn deactivate_client(&self, id: ClientId) -> RepositoryResult<Client>;
        fn delete_client(&self, id: ClientId) -> RepositoryResult<()>;
    }

    impl ProjectReader for Repository {
        fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<ProjectListing>>;
        fn list_projects(
            &self,
            query: &QueryDescriptor,
        ) -> RepositoryResult<(usize, Vec<ProjectListing>)>;
    }

    impl ProjectWriter for Repository {
        fn create_project(&self, project: &NewProject) -> RepositoryResult<Project>;
        fn update_project(&self, id: ProjectId, project: &NewProject) -> RepositoryResult<Project>;
        fn delete_project(&self, id: ProjectId) -> RepositoryResult<()>;
    }

    impl ContractReader for Repository {
        fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<ContractListing>>;
        fn list_contracts(
            &self,
            query: &QueryDescriptor,
        ) -> RepositoryResult<(usize, Vec<ContractListing>)>;
    }

    impl ContractWriter for Repository {
        fn create_contract(&self, contract: &NewContract) -> RepositoryResult<Contract>;
        fn update_contract(
            &self,
            id: ContractId,
            contract: &NewContract,
        ) -> RepositoryResult<Contract>;
        fn delete_contract(&self, id: ContractId) -> RepositoryResult<()>;
    }

    impl FinancialReader for Repository {
        fn get_entry_by_id(
            &self,
            id: FinancialEntryId,
        ) -> RepositoryResult<Option<FinancialListing>>;
        fn list_entries(
            &self,
            query: &QueryDescriptor,
        ) -> RepositoryResult<(usize, Vec<FinancialListing>)>;
    }

    impl FinancialWriter for Repository {
        fn create_entry(&self, entry: &NewFinancialEntry) -> RepositoryResult<FinancialEntry>;
        fn update_entry(
            &self,
            id: FinancialEntryId,
            entry: &NewFinancialEntry,
        ) -> RepositoryResult<FinancialEntry>;
        fn mark_entry_paid(
            &self,
            id: FinancialEntryId,
            payment: &Payment,
        ) -> RepositoryResult<FinancialEntry>;
        fn delete_entry(&self, id: FinancialEntryId) -> RepositoryResult<()>;
    }

    impl MeetingReader for Repository {
        fn get_meeting_by_id(&self, id: MeetingId) -> RepositoryResult<Option<MeetingListing>>;
        fn list_meetings(
            &self,
            query: &QueryDescriptor,
        ) -> RepositoryResult<(usize, Vec<MeetingListing>)>;
    }

    impl MeetingWriter for Repository {
        fn create_meeting(&self, meeting: &NewMeeting) -> RepositoryResult<Meeting>;
        fn update_meeting(&self, id: MeetingId, meeting: &NewMeeting) -> RepositoryResult<Meeting>;
        fn delete_meeting(&self, id: MeetingId) -> RepositoryResult<()>;
    }

    impl ScheduleReader for Repository {
        fn get_phase_by_id(&self, id: PhaseId) -> RepositoryResult<Option<ScheduleListing>>;
        fn list_phases(
            &self,
            query: &QueryDescriptor,
        ) -> RepositoryResult<(usize, Vec<ScheduleListing>)>;
    }

    impl ScheduleWriter for Repository {
        fn create_phase(&self, phase: &NewSchedulePhase) -> RepositoryResult<SchedulePhase>;
        fn update_phase(
            &self,
            id: PhaseId,
            phase: &NewSchedulePhase,
        ) -> RepositoryResult<SchedulePhase>;
        fn record_progress(
            &self,
            id: PhaseId,
            progress: &Progress,
        ) -> RepositoryResult<SchedulePhase>;
        fn delete_phase(&self, id: PhaseId) -> RepositoryResult<()>;
    }

    impl DashboardReader for Repository {
        fn dashboard_snapshot(
            &self,
            window: &ActivityWindow,
        ) -> RepositoryResult<DashboardSnapshot>;
    }
}
