//! Stored-resume persistence. Rows are assembled into a `ResumeContent` ordered by
//! `position`; translated copies are inserted as new records and never overwrite the source.

use sqlx::{FromRow, PgPool, Postgres, Result, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{
    Certification, Education, EndDate, LanguageSkill, ResumeContent, Skill, WorkExperience,
};

#[derive(Debug, Clone, FromRow)]
struct ResumeRow {
    user_id: Uuid,
    full_name: String,
    email: String,
    phone: Option<String>,
    location: Option<String>,
    website: Option<String>,
    linkedin: Option<String>,
    summary: Option<String>,
    language: Option<String>,
}

#[derive(Debug, FromRow)]
struct WorkExperienceRow {
    job_title: String,
    company: String,
    location: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    description: Option<String>,
    company_description: Option<String>,
    tech_stack: Option<Vec<String>>,
}

impl From<WorkExperienceRow> for WorkExperience {
    fn from(row: WorkExperienceRow) -> Self {
        WorkExperience {
            job_title: row.job_title,
            company: row.company,
            location: row.location.unwrap_or_default(),
            start_date: row.start_date.unwrap_or_default(),
            end_date: EndDate::from_raw(row.end_date.as_deref()),
            description: row.description.unwrap_or_default(),
            company_description: row.company_description.unwrap_or_default(),
            tech_stack: row.tech_stack.unwrap_or_default(),
        }
    }
}

#[derive(Debug, FromRow)]
struct EducationRow {
    degree: Option<String>,
    major: Option<String>,
    institution: String,
    start_year: Option<i32>,
    graduation_year: Option<i32>,
    description: Option<String>,
}

impl From<EducationRow> for Education {
    fn from(row: EducationRow) -> Self {
        Education {
            degree: row.degree.unwrap_or_default(),
            major: row.major.unwrap_or_default(),
            institution: row.institution,
            start_year: row.start_year,
            graduation_year: row.graduation_year,
            description: row.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, FromRow)]
struct LanguageRow {
    name: String,
    proficiency: Option<String>,
}

#[derive(Debug, FromRow)]
struct CertificationRow {
    name: String,
    issuer: Option<String>,
    issue_date: Option<String>,
}

/// A stored resume plus the owner it belongs to.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: ResumeContent,
}

/// Loads a stored resume with all of its relations, or `None` if `resume_id` is unknown.
pub async fn load_resume(pool: &PgPool, resume_id: Uuid) -> Result<Option<StoredResume>> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT user_id, full_name, email, phone, location, website, linkedin, summary, language
        FROM resumes
        WHERE id = $1
        "#,
    )
    .bind(resume_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let work_experience = sqlx::query_as::<_, WorkExperienceRow>(
        r#"
        SELECT job_title, company, location, start_date, end_date,
               description, company_description, tech_stack
        FROM work_experiences
        WHERE resume_id = $1
        ORDER BY position
        "#,
    )
    .bind(resume_id)
    .fetch_all(pool)
    .await?;

    let education = sqlx::query_as::<_, EducationRow>(
        r#"
        SELECT degree, major, institution, start_year, graduation_year, description
        FROM educations
        WHERE resume_id = $1
        ORDER BY position
        "#,
    )
    .bind(resume_id)
    .fetch_all(pool)
    .await?;

    let skills: Vec<String> =
        sqlx::query_scalar("SELECT name FROM skills WHERE resume_id = $1 ORDER BY position")
            .bind(resume_id)
            .fetch_all(pool)
            .await?;

    let languages = sqlx::query_as::<_, LanguageRow>(
        "SELECT name, proficiency FROM resume_languages WHERE resume_id = $1 ORDER BY position",
    )
    .bind(resume_id)
    .fetch_all(pool)
    .await?;

    let certifications = sqlx::query_as::<_, CertificationRow>(
        "SELECT name, issuer, issue_date FROM certifications WHERE resume_id = $1 ORDER BY position",
    )
    .bind(resume_id)
    .fetch_all(pool)
    .await?;

    let mut content = ResumeContent {
        full_name: row.full_name,
        email: row.email,
        phone: row.phone,
        location: row.location,
        website: row.website,
        linkedin: row.linkedin,
        summary: row.summary.unwrap_or_default(),
        work_experience: work_experience.into_iter().map(Into::into).collect(),
        education: education.into_iter().map(Into::into).collect(),
        skills: skills.into_iter().map(|name| Skill { name }).collect(),
        languages: languages
            .into_iter()
            .map(|l| LanguageSkill {
                name: l.name,
                proficiency: l.proficiency.unwrap_or_default(),
            })
            .collect(),
        certifications: certifications
            .into_iter()
            .map(|c| Certification {
                name: c.name,
                issuer: c.issuer.unwrap_or_default(),
                issue_date: c.issue_date,
            })
            .collect(),
        ..ResumeContent::default()
    };
    if let Some(language) = row.language.filter(|l| !l.trim().is_empty()) {
        content.language = language;
    }

    Ok(Some(StoredResume {
        id: resume_id,
        user_id: row.user_id,
        content,
    }))
}

/// Inserts `content` as a brand-new resume owned by `user_id`, all rows in one transaction.
pub async fn save_resume_copy(pool: &PgPool, user_id: Uuid, content: &ResumeContent) -> Result<Uuid> {
    let resume_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO resumes
            (id, user_id, full_name, email, phone, location, website, linkedin, summary, language)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(resume_id)
    .bind(user_id)
    .bind(&content.full_name)
    .bind(&content.email)
    .bind(&content.phone)
    .bind(&content.location)
    .bind(&content.website)
    .bind(&content.linkedin)
    .bind(&content.summary)
    .bind(&content.language)
    .execute(&mut *tx)
    .await?;

    insert_relations(&mut tx, resume_id, content).await?;

    tx.commit().await?;

    info!(
        "Saved resume {resume_id} for user {user_id} (language: {})",
        content.language
    );
    Ok(resume_id)
}

async fn insert_relations(
    tx: &mut Transaction<'_, Postgres>,
    resume_id: Uuid,
    content: &ResumeContent,
) -> Result<()> {
    for (position, job) in (0i32..).zip(&content.work_experience) {
        sqlx::query(
            r#"
            INSERT INTO work_experiences
                (resume_id, position, job_title, company, location, start_date, end_date,
                 description, company_description, tech_stack)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(resume_id)
        .bind(position)
        .bind(&job.job_title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.start_date)
        .bind(job.end_date.as_date())
        .bind(&job.description)
        .bind(&job.company_description)
        .bind(&job.tech_stack)
        .execute(&mut **tx)
        .await?;
    }

    for (position, edu) in (0i32..).zip(&content.education) {
        sqlx::query(
            r#"
            INSERT INTO educations
                (resume_id, position, degree, major, institution, start_year,
                 graduation_year, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(resume_id)
        .bind(position)
        .bind(&edu.degree)
        .bind(&edu.major)
        .bind(&edu.institution)
        .bind(edu.start_year)
        .bind(edu.graduation_year)
        .bind(&edu.description)
        .execute(&mut **tx)
        .await?;
    }

    for (position, skill) in (0i32..).zip(&content.skills) {
        sqlx::query("INSERT INTO skills (resume_id, position, name) VALUES ($1, $2, $3)")
            .bind(resume_id)
            .bind(position)
            .bind(&skill.name)
            .execute(&mut **tx)
            .await?;
    }

    for (position, lang) in (0i32..).zip(&content.languages) {
        sqlx::query(
            "INSERT INTO resume_languages (resume_id, position, name, proficiency) VALUES ($1, $2, $3, $4)",
        )
        .bind(resume_id)
        .bind(position)
        .bind(&lang.name)
        .bind(&lang.proficiency)
        .execute(&mut **tx)
        .await?;
    }

    for (position, cert) in (0i32..).zip(&content.certifications) {
        sqlx::query(
            r#"
            INSERT INTO certifications (resume_id, position, name, issuer, issue_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(resume_id)
        .bind(position)
        .bind(&cert.name)
        .bind(&cert.issuer)
        .bind(&cert.issue_date)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
