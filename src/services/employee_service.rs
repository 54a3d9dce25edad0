use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::employee_dto::{CreateEmployeeRequest, UpdateEmployeeRequest};
use crate::models::candidate::Paginated;
use crate::models::employee::Employee;
use crate::utils::time;

#[derive(Clone)]
pub struct EmployeeService {
    pool: PgPool,
}

const ALL_COLUMNS: &str = "id, candidate_id, full_name, email, phone, department, position, \
     notes, birthday_at, hired_at, terminated_at, created_at, updated_at";

impl EmployeeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    pub async fn list(&self, page: i64, page_size: i64) -> Result<Paginated<Employee>> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 2000);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees ORDER BY hired_at DESC, created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page_size)
        .bind((page - 1) * page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated {
            items,
            page,
            page_size,
            total,
        })
    }

    pub async fn create(&self, req: CreateEmployeeRequest) -> Result<Employee> {
        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM employees WHERE email = $1")
                .bind(&req.email)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_some() {
            return Err(anyhow::anyhow!(
                "An employee with this email address already exists."
            ));
        }

        let employee = sqlx::query_as::<_, Employee>(&format!(
            "INSERT INTO employees \
                (candidate_id, full_name, email, phone, department, position, notes, \
                 birthday_at, hired_at, terminated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(req.candidate_id)
        .bind(req.full_name.trim())
        .bind(req.email.trim())
        .bind(req.phone)
        .bind(req.department)
        .bind(req.position)
        .bind(req.notes)
        .bind(req.birthday_at)
        .bind(req.hired_at.unwrap_or_else(time::now))
        .bind(req.terminated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(employee)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateEmployeeRequest,
    ) -> Result<Option<Employee>> {
        let Some(mut employee) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(full_name) = patch.full_name {
            employee.full_name = full_name.trim().to_string();
        }
        if let Some(email) = patch.email {
            let email = email.trim().to_string();
            if !email.eq_ignore_ascii_case(&employee.email) {
                let taken: Option<Uuid> = sqlx::query_scalar(
                    "SELECT id FROM employees WHERE email = $1 AND id != $2",
                )
                .bind(&email)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
                if taken.is_some() {
                    return Err(anyhow::anyhow!(
                        "An employee with this email address already exists."
                    ));
                }
            }
            employee.email = email;
        }
        if let Some(phone) = patch.phone {
            employee.phone = phone;
        }
        if let Some(department) = patch.department {
            if employee.department != department {
                employee.department = department;
                if let Some(pos) = &employee.position {
                    if !crate::catalog::is_position_for(&employee.department, pos) {
                        employee.position = None;
                    }
                }
            }
        }
        if let Some(position) = patch.position {
            if let Some(pos) = &position {
                if !crate::catalog::is_position_for(&employee.department, pos) {
                    return Err(anyhow::anyhow!(
                        "Position {} is not available for this department",
                        pos
                    ));
                }
            }
            employee.position = position;
        }
        if let Some(notes) = patch.notes {
            employee.notes = notes;
        }
        if let Some(birthday_at) = patch.birthday_at {
            employee.birthday_at = birthday_at;
        }
        if let Some(hired_at) = patch.hired_at {
            employee.hired_at = hired_at;
        }
        if let Some(terminated_at) = patch.terminated_at {
            employee.terminated_at = terminated_at;
        }

        let updated = sqlx::query_as::<_, Employee>(&format!(
            "UPDATE employees SET \
                full_name = $2, email = $3, phone = $4, department = $5, position = $6, \
                notes = $7, birthday_at = $8, hired_at = $9, terminated_at = $10, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(employee.id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.department)
        .bind(&employee.position)
        .bind(&employee.notes)
        .bind(employee.birthday_at)
        .bind(employee.hired_at)
        .bind(employee.terminated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
