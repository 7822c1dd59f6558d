use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::db::fold_case;
use crate::domain::project::{NewProject, Project, ProjectListing};
use crate::domain::types::ProjectId;
use crate::models::project::{
    NewProject as DbNewProject, Project as DbProject, UpdateProject as DbUpdateProject,
};
use crate::query::{Predicate, QueryDescriptor, SortDirection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    Condition, DieselRepository, ProjectReader, ProjectWriter, any_of, conditions, like_pattern,
    parse_id, summaries, unsupported,
};
use crate::schema::projetos;

type ProjectQuery = projetos::BoxedQuery<'static, Sqlite>;

fn search_field(field: &str, pattern: &str) -> RepositoryResult<Condition<projetos::table>> {
    let pattern = pattern.to_string();
    let condition: Condition<projetos::table> = match field {
        "nome" => Box::new(fold_case(projetos::nome.nullable()).like(pattern)),
        "descricao" => Box::new(fold_case(projetos::descricao).like(pattern)),
        other => return Err(unsupported("projetos", other)),
    };
    Ok(condition)
}

fn condition(predicate: &Predicate) -> RepositoryResult<Condition<projetos::table>> {
    let condition: Condition<projetos::table> = match predicate {
        Predicate::Equals {
            field: "status",
            value,
        } => Box::new(projetos::status.eq(value.clone()).nullable()),
        Predicate::Equals {
            field: field @ "cliente_id",
            value,
        } => Box::new(projetos::cliente_id.eq(parse_id(field, value)?).nullable()),
        Predicate::Matches { fields, term } => {
            let pattern = like_pattern(term);
            let matches = fields
                .iter()
                .map(|field| search_field(field, &pattern))
                .collect::<RepositoryResult<Vec<_>>>()?;
            any_of(matches).ok_or_else(|| unsupported("projetos", predicate))?
        }
        other => return Err(unsupported("projetos", other)),
    };
    Ok(condition)
}

fn filtered(query: &QueryDescriptor) -> RepositoryResult<ProjectQuery> {
    conditions(query, condition).map(|conditions| {
        conditions
            .into_iter()
            .fold(projetos::table.into_boxed(), |items, condition| {
                items.filter(condition)
            })
    })
}

fn sorted(mut items: ProjectQuery, query: &QueryDescriptor) -> RepositoryResult<ProjectQuery> {
    for (position, key) in query.sort().iter().enumerate() {
        let first = position == 0;
        items = match (key.field, key.direction) {
            ("created_at", SortDirection::Descending) => {
                order!(items, first, projetos::created_at.desc())
            }
            ("created_at", SortDirection::Ascending) => {
                order!(items, first, projetos::created_at.asc())
            }
            ("id", SortDirection::Descending) => order!(items, first, projetos::id.desc()),
            ("id", SortDirection::Ascending) => order!(items, first, projetos::id.asc()),
            _ => return Err(unsupported("projetos", key)),
        };
    }
    Ok(items)
}

impl DieselRepository {
    /// Attaches each project's client.
    fn project_listings(
        &self,
        conn: &mut SqliteConnection,
        rows: Vec<DbProject>,
    ) -> RepositoryResult<Vec<ProjectListing>> {
        let owners = summaries::clients(conn, rows.iter().map(|row| row.cliente_id))?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<ProjectListing> {
                let clientes = owners.get(&row.cliente_id).cloned();
                Ok(ProjectListing {
                    project: Project::try_from(row)?,
                    clientes,
                })
            })
            .collect()
    }
}

impl ProjectReader for DieselRepository {
    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<ProjectListing>> {
        let mut conn = self.conn()?;

        let Some(row) = projetos::table
            .find(id.get())
            .first::<DbProject>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        Ok(self.project_listings(&mut conn, vec![row])?.pop())
    }

    fn list_projects(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<ProjectListing>)> {
        let mut conn = self.conn()?;

        let (total, rows) = load_page!(&mut conn, query, filtered, sorted, DbProject);
        let projects = self.project_listings(&mut conn, rows)?;

        Ok((total, projects))
    }
}

impl ProjectWriter for DieselRepository {
    fn create_project(&self, project: &NewProject) -> RepositoryResult<Project> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(projetos::table)
            .values(DbNewProject::from(project))
            .get_result::<DbProject>(&mut conn)?;

        Ok(Project::try_from(created)?)
    }

    fn update_project(&self, id: ProjectId, project: &NewProject) -> RepositoryResult<Project> {
        let mut conn = self.conn()?;

        let updated = diesel::update(projetos::table.find(id.get()))
            .set(DbUpdateProject::new(project, Utc::now().naive_utc()))
            .get_result::<DbProject>(&mut conn)?;

        Ok(Project::try_from(updated)?)
    }

    fn delete_project(&self, id: ProjectId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(projetos::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
