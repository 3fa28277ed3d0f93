//! In-memory repository stubs shared by the service and handler tests.
//!
//! Each stub mirrors the Diesel adapter's observable behaviour: exact-name
//! lookups, case-insensitive uniqueness, substring search with a count
//! taken before the page slice. `fail_with` arms a stub to return a fixed
//! repository error from every call.

use std::sync::Mutex;

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::course::{Course, NewCourse};
use crate::domain::group::Group;
use crate::domain::ports::{
    CourseRepository, GroupRepository, ProfessorRepository, RepositoryError, SearchOrder,
    SearchQuery, SemesterRepository, SubjectRepository, TagRepository,
};
use crate::domain::professor::Professor;
use crate::domain::semester::Semester;
use crate::domain::subject::Subject;
use crate::domain::tag::Tag;

/// Shape shared by the named catalogue entities.
pub(crate) trait Named: Clone + Send {
    fn build(id: i64, name: &str) -> Self;
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

impl Named for Subject {
    fn build(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
        }
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Semester {
    fn build(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
        }
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Group {
    fn build(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
        }
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Tag {
    fn build(id: i64, name: &str) -> Self {
        Self {
            id,
            label: name.to_owned(),
        }
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.label
    }
}

struct TableState<T> {
    rows: Vec<T>,
    next_id: i64,
    fail: Option<RepositoryError>,
}

impl<T> Default for TableState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
            fail: None,
        }
    }
}

/// Mutex-backed table of one named entity.
pub(crate) struct NamedStore<T> {
    state: Mutex<TableState<T>>,
    professor_links: Mutex<Vec<(i64, i64)>>,
}

impl<T> Default for NamedStore<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(TableState::default()),
            professor_links: Mutex::new(Vec::new()),
        }
    }
}

fn slice_page<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    rows.iter()
        .skip(usize::try_from(page.offset()).unwrap_or(0))
        .take(usize::try_from(page.limit()).unwrap_or(0))
        .cloned()
        .collect()
}

impl<T: Named> NamedStore<T> {
    fn check(&self) -> Result<(), RepositoryError> {
        match &self.state.lock().expect("stub lock").fail {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn fail_with(&self, err: RepositoryError) {
        self.state.lock().expect("stub lock").fail = Some(err);
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().expect("stub lock").rows.len()
    }

    #[allow(dead_code)]
    pub(crate) fn link_professor(&self, professor_id: i64, entity_id: i64) {
        self.professor_links
            .lock()
            .expect("stub lock")
            .push((professor_id, entity_id));
    }

    fn insert(&self, name: &str) -> Result<T, RepositoryError> {
        self.check()?;
        let mut state = self.state.lock().expect("stub lock");
        let row = T::build(state.next_id, name);
        state.next_id += 1;
        state.rows.push(row.clone());
        Ok(row)
    }

    fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError> {
        self.check()?;
        let mut state = self.state.lock().expect("stub lock");
        let Some(row) = state.rows.iter_mut().find(|r| r.id() == id) else {
            return Ok(0);
        };
        *row = T::build(id, name);
        Ok(1)
    }

    fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.check()?;
        self.state
            .lock()
            .expect("stub lock")
            .rows
            .retain(|r| r.id() != id);
        Ok(())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<T>, RepositoryError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<T>, RepositoryError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .find(|r| r.name() == name)
            .cloned())
    }

    fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError> {
        self.check()?;
        let wanted = name.to_lowercase();
        Ok(self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .any(|r| r.id() != id && r.name().to_lowercase() == wanted))
    }

    fn count(&self) -> Result<i64, RepositoryError> {
        self.check()?;
        Ok(self.state.lock().expect("stub lock").rows.len() as i64)
    }

    fn page(&self, page: PageRequest) -> Result<Vec<T>, RepositoryError> {
        self.check()?;
        let mut rows = self.state.lock().expect("stub lock").rows.clone();
        rows.sort_by_key(Named::id);
        Ok(slice_page(&rows, page))
    }

    fn list_all(&self) -> Result<Vec<T>, RepositoryError> {
        self.check()?;
        let mut rows = self.state.lock().expect("stub lock").rows.clone();
        rows.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(rows)
    }

    fn search(&self, query: &SearchQuery) -> Result<(Vec<T>, i64), RepositoryError> {
        self.check()?;
        let mut rows: Vec<T> = self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .filter(|r| r.name().to_lowercase().contains(&query.keyword))
            .cloned()
            .collect();
        match query.order {
            SearchOrder::IdAsc => rows.sort_by_key(Named::id),
            SearchOrder::NameAsc => rows.sort_by(|a, b| a.name().cmp(b.name())),
            SearchOrder::NameDesc => rows.sort_by(|a, b| b.name().cmp(a.name())),
        }
        let total = rows.len() as i64;
        Ok((slice_page(&rows, query.page), total))
    }

    fn list_for_professor(&self, professor_id: i64) -> Result<Vec<T>, RepositoryError> {
        self.check()?;
        let links = self.professor_links.lock().expect("stub lock");
        let mut rows: Vec<T> = self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .filter(|r| {
                links
                    .iter()
                    .any(|(prof, entity)| *prof == professor_id && *entity == r.id())
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(rows)
    }
}

macro_rules! named_repository_stub {
    ($stub:ident, $entity:ty, $port:ident) => {
        /// In-memory stand-in for the Diesel adapter.
        #[derive(Default)]
        pub(crate) struct $stub {
            store: NamedStore<$entity>,
        }

        impl $stub {
            #[allow(dead_code)]
            pub(crate) fn fail_with(&self, err: RepositoryError) {
                self.store.fail_with(err);
            }

            #[allow(dead_code)]
            pub(crate) fn len(&self) -> usize {
                self.store.len()
            }

            #[allow(dead_code)]
            pub(crate) fn link_professor(&self, professor_id: i64, entity_id: i64) {
                self.store.link_professor(professor_id, entity_id);
            }
        }

        #[async_trait]
        impl $port for $stub {
            async fn insert(&self, name: &str) -> Result<$entity, RepositoryError> {
                self.store.insert(name)
            }
            async fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError> {
                self.store.update(id, name)
            }
            async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError> {
                self.store.delete(id)
            }
            async fn find_by_id(&self, id: i64) -> Result<Option<$entity>, RepositoryError> {
                self.store.find_by_id(id)
            }
            async fn find_by_name(&self, name: &str) -> Result<Option<$entity>, RepositoryError> {
                self.store.find_by_name(name)
            }
            async fn exists_excluding(
                &self,
                id: i64,
                name: &str,
            ) -> Result<bool, RepositoryError> {
                self.store.exists_excluding(id, name)
            }
            async fn count(&self) -> Result<i64, RepositoryError> {
                self.store.count()
            }
            async fn page(&self, page: PageRequest) -> Result<Vec<$entity>, RepositoryError> {
                self.store.page(page)
            }
            async fn list_all(&self) -> Result<Vec<$entity>, RepositoryError> {
                self.store.list_all()
            }
            async fn search(
                &self,
                query: &SearchQuery,
            ) -> Result<(Vec<$entity>, i64), RepositoryError> {
                self.store.search(query)
            }
            async fn list_for_professor(
                &self,
                professor_id: i64,
            ) -> Result<Vec<$entity>, RepositoryError> {
                self.store.list_for_professor(professor_id)
            }
        }
    };
}

named_repository_stub!(InMemorySubjects, Subject, SubjectRepository);
named_repository_stub!(InMemorySemesters, Semester, SemesterRepository);
named_repository_stub!(InMemoryGroups, Group, GroupRepository);

/// In-memory tag table plus its repository links.
#[derive(Default)]
pub(crate) struct InMemoryTags {
    store: NamedStore<Tag>,
    links: Mutex<Vec<(i64, i64)>>,
}

impl InMemoryTags {
    #[allow(dead_code)]
    pub(crate) fn fail_with(&self, err: RepositoryError) {
        self.store.fail_with(err);
    }

    pub(crate) fn link_repository(&self, tag_id: i64, repo_id: i64) {
        self.links.lock().expect("stub lock").push((repo_id, tag_id));
    }

    pub(crate) fn link_count(&self) -> usize {
        self.links.lock().expect("stub lock").len()
    }
}

#[async_trait]
impl TagRepository for InMemoryTags {
    async fn insert(&self, label: &str) -> Result<Tag, RepositoryError> {
        self.store.insert(label)
    }
    async fn update(&self, id: i64, label: &str) -> Result<usize, RepositoryError> {
        self.store.update(id, label)
    }
    async fn delete_with_links(&self, id: i64) -> Result<(), RepositoryError> {
        self.store.delete(id)?;
        self.links
            .lock()
            .expect("stub lock")
            .retain(|(_, tag)| *tag != id);
        Ok(())
    }
    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, RepositoryError> {
        self.store.find_by_id(id)
    }
    async fn find_by_label(&self, label: &str) -> Result<Option<Tag>, RepositoryError> {
        self.store.find_by_name(label)
    }
    async fn exists_excluding(&self, id: i64, label: &str) -> Result<bool, RepositoryError> {
        self.store.exists_excluding(id, label)
    }
    async fn count(&self) -> Result<i64, RepositoryError> {
        self.store.count()
    }
    async fn page(&self, page: PageRequest) -> Result<Vec<Tag>, RepositoryError> {
        self.store.page(page)
    }
    async fn list_all(&self) -> Result<Vec<Tag>, RepositoryError> {
        self.store.list_all()
    }
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Tag>, i64), RepositoryError> {
        self.store.search(query)
    }
}

/// In-memory course table.
#[derive(Default)]
pub(crate) struct InMemoryCourses {
    state: Mutex<TableState<Course>>,
}

impl InMemoryCourses {
    fn check(&self) -> Result<(), RepositoryError> {
        match &self.state.lock().expect("stub lock").fail {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn fail_with(&self, err: RepositoryError) {
        self.state.lock().expect("stub lock").fail = Some(err);
    }

    pub(crate) fn get(&self, id: i64) -> Option<Course> {
        self.state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourses {
    async fn insert(&self, new: &NewCourse) -> Result<Course, RepositoryError> {
        self.check()?;
        let mut state = self.state.lock().expect("stub lock");
        let course = Course {
            id: state.next_id,
            professor_id: new.professor_id,
            subject_id: new.subject_id,
            semester_id: new.semester_id,
            group_id: new.group_id,
            is_active: new.is_active,
        };
        state.next_id += 1;
        state.rows.push(course.clone());
        Ok(course)
    }

    async fn tuple_exists(&self, new: &NewCourse) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.state.lock().expect("stub lock").rows.iter().any(|c| {
            c.professor_id == new.professor_id
                && c.subject_id == new.subject_id
                && c.semester_id == new.semester_id
                && c.group_id == new.group_id
        }))
    }

    async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Course>, RepositoryError> {
        self.check()?;
        let mut rows: Vec<Course> = self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .filter(|c| c.professor_id == professor_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.id);
        Ok(rows)
    }

    async fn find_by_professor_and_subject(
        &self,
        professor_id: i64,
        subject_id: i64,
    ) -> Result<Option<Course>, RepositoryError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .find(|c| c.professor_id == professor_id && c.subject_id == subject_id)
            .cloned())
    }

    async fn find_for_professor(
        &self,
        professor_id: i64,
        course_id: i64,
    ) -> Result<Option<Course>, RepositoryError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .find(|c| c.professor_id == professor_id && c.id == course_id)
            .cloned())
    }

    async fn set_active(&self, course_id: i64, active: bool) -> Result<usize, RepositoryError> {
        self.check()?;
        let mut state = self.state.lock().expect("stub lock");
        let Some(course) = state.rows.iter_mut().find(|c| c.id == course_id) else {
            return Ok(0);
        };
        course.is_active = active;
        Ok(1)
    }

    async fn delete(&self, course_id: i64) -> Result<(), RepositoryError> {
        self.check()?;
        self.state
            .lock()
            .expect("stub lock")
            .rows
            .retain(|c| c.id != course_id);
        Ok(())
    }
}

/// In-memory professor table.
#[derive(Default)]
pub(crate) struct InMemoryProfessors {
    state: Mutex<TableState<Professor>>,
}

impl InMemoryProfessors {
    fn check(&self) -> Result<(), RepositoryError> {
        match &self.state.lock().expect("stub lock").fail {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn fail_with(&self, err: RepositoryError) {
        self.state.lock().expect("stub lock").fail = Some(err);
    }

    pub(crate) fn seed(&self, name: &str, is_active: bool, prohibit_login: bool) -> i64 {
        let mut state = self.state.lock().expect("stub lock");
        let id = state.next_id;
        state.next_id += 1;
        state.rows.push(Professor {
            id,
            name: name.to_owned(),
            is_active,
            prohibit_login,
        });
        id
    }

    fn filtered(&self, pending: bool) -> Vec<Professor> {
        let mut rows: Vec<Professor> = self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .filter(|p| {
                if pending {
                    p.prohibit_login
                } else {
                    p.is_active
                }
            })
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id);
        rows
    }
}

#[async_trait]
impl ProfessorRepository for InMemoryProfessors {
    async fn find_by_id(&self, id: i64) -> Result<Option<Professor>, RepositoryError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .expect("stub lock")
            .rows
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn page_active(&self, page: PageRequest) -> Result<Vec<Professor>, RepositoryError> {
        self.check()?;
        Ok(slice_page(&self.filtered(false), page))
    }

    async fn count_active(&self) -> Result<i64, RepositoryError> {
        self.check()?;
        Ok(self.filtered(false).len() as i64)
    }

    async fn page_pending(&self, page: PageRequest) -> Result<Vec<Professor>, RepositoryError> {
        self.check()?;
        Ok(slice_page(&self.filtered(true), page))
    }

    async fn count_pending(&self) -> Result<i64, RepositoryError> {
        self.check()?;
        Ok(self.filtered(true).len() as i64)
    }

    async fn set_approval(
        &self,
        id: i64,
        is_active: bool,
        prohibit_login: bool,
    ) -> Result<usize, RepositoryError> {
        self.check()?;
        let mut state = self.state.lock().expect("stub lock");
        let Some(professor) = state.rows.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        professor.is_active = is_active;
        professor.prohibit_login = prohibit_login;
        Ok(1)
    }

    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError> {
        self.check()?;
        self.state
            .lock()
            .expect("stub lock")
            .rows
            .retain(|p| p.id != id);
        Ok(())
    }
}

/// Ids of the rows seeded by [`fixture_world`].
pub(crate) struct FixtureIds {
    pub(crate) professor_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) semester_id: i64,
    pub(crate) group_id: i64,
}

/// Seed one professor, subject, semester, and group and return their ids.
pub(crate) async fn fixture_world(
    subjects: &InMemorySubjects,
    semesters: &InMemorySemesters,
    groups: &InMemoryGroups,
    professors: &InMemoryProfessors,
) -> FixtureIds {
    let subject = SubjectRepository::insert(subjects, "Math")
        .await
        .expect("seed subject");
    let semester = SemesterRepository::insert(semesters, "2026-1")
        .await
        .expect("seed semester");
    let group = GroupRepository::insert(groups, "Group A")
        .await
        .expect("seed group");
    let professor_id = professors.seed("Ada", true, false);
    FixtureIds {
        professor_id,
        subject_id: subject.id,
        semester_id: semester.id,
        group_id: group.id,
    }
}
