//! Payroll Repository
//!
//! Bank details, salary structures, PF contributions, tax deductions and
//! personal info. Plain record keeping; the only invariants are the
//! one-per-employee keys and the per-month uniqueness indexes.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    BankDetails, BankDetailsUpsert, PersonalInfo, PersonalInfoUpsert, PfContribution,
    PfContributionCreate, SalaryStructure, SalaryStructureCreate, TaxDeduction,
    TaxDeductionCreate,
};
use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal, engine::local::Db};

fn validate_month_year(month: u32, year: i32) -> RepoResult<()> {
    if !(1..=12).contains(&month) {
        return Err(RepoError::Validation("month must be 1-12".to_string()));
    }
    if !(2000..=2100).contains(&year) {
        return Err(RepoError::Validation("year must be 2000-2100".to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PayrollRepository {
    base: BaseRepository,
}

impl PayrollRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    // ── Bank details ────────────────────────────────────────────────

    pub async fn bank_details_for(&self, emp_id: &str) -> RepoResult<Option<BankDetails>> {
        let rid = RecordId::from_table_key("bank_details", emp_id);
        let details: Option<BankDetails> = self.base.db().select(rid).await?;
        Ok(details)
    }

    /// Create or replace the employee's bank details (record key = emp_id,
    /// which is what keeps them one-per-employee).
    pub async fn upsert_bank_details(
        &self,
        emp_id: &str,
        data: BankDetailsUpsert,
    ) -> RepoResult<BankDetails> {
        let rid = RecordId::from_table_key("bank_details", emp_id);
        let now = Utc::now();
        let existing = self.bank_details_for(emp_id).await?;

        let row = BankDetails {
            id: None,
            emp_id: emp_id.to_string(),
            account_number: data.account_number,
            bank_name: data.bank_name,
            ifsc_code: data.ifsc_code,
            pan_no: data.pan_no,
            uan_no: data.uan_no,
            branch_name: data.branch_name,
            account_holder_name: data.account_holder_name,
            account_type: data.account_type,
            is_verified: data
                .is_verified
                .unwrap_or(existing.as_ref().map(|e| e.is_verified).unwrap_or(false)),
            created_at: existing.as_ref().map(|e| e.created_at).unwrap_or(now),
            updated_at: now,
        };

        let saved: Option<BankDetails> = match existing {
            Some(_) => self.base.db().update(rid).content(row).await?,
            None => self.base.db().create(rid).content(row).await?,
        };
        saved.ok_or_else(|| RepoError::Database("Failed to save bank details".to_string()))
    }

    // ── Salary structure ────────────────────────────────────────────

    pub async fn active_salary_for(&self, emp_id: &str) -> RepoResult<Option<SalaryStructure>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM salary_structure WHERE emp_id = $emp_id AND is_active = true",
            )
            .bind(("emp_id", emp_id))
            .await?;
        let rows: Vec<SalaryStructure> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Install a new salary structure; the previous active one (if any) is
    /// closed in the same transaction so at most one stays active.
    pub async fn create_salary(
        &self,
        emp_id: &str,
        data: SalaryStructureCreate,
    ) -> RepoResult<SalaryStructure> {
        if data.monthly_wage <= Decimal::ZERO {
            return Err(RepoError::Validation(
                "monthly_wage must be positive".to_string(),
            ));
        }

        let now = Utc::now();
        let row = SalaryStructure {
            id: None,
            emp_id: emp_id.to_string(),
            monthly_wage: data.monthly_wage,
            no_of_working_days_in_week: data.no_of_working_days_in_week,
            standard_allowance: data.standard_allowance,
            fixed_allowance: data.fixed_allowance,
            effective_from: data.effective_from,
            effective_to: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE salary_structure SET
                    is_active = false,
                    effective_to = $effective_from,
                    updated_at = $now
                WHERE emp_id = $emp_id AND is_active = true;
                CREATE salary_structure CONTENT $row;
                COMMIT TRANSACTION;"#,
            )
            .bind(("emp_id", emp_id.to_string()))
            .bind(("effective_from", data.effective_from))
            .bind(("now", now))
            .bind(("row", row))
            .await?
            .check()?;

        self.active_salary_for(emp_id)
            .await?
            .ok_or_else(|| RepoError::Database("Salary structure vanished after commit".to_string()))
    }

    // ── PF contributions ────────────────────────────────────────────

    pub async fn pf_contributions_for(&self, emp_id: &str) -> RepoResult<Vec<PfContribution>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM pf_contribution WHERE emp_id = $emp_id ORDER BY year DESC, month DESC",
            )
            .bind(("emp_id", emp_id))
            .await?;
        let rows: Vec<PfContribution> = result.take(0)?;
        Ok(rows)
    }

    pub async fn record_pf_contribution(
        &self,
        emp_id: &str,
        data: PfContributionCreate,
    ) -> RepoResult<PfContribution> {
        validate_month_year(data.month, data.year)?;
        if data.basic_salary <= Decimal::ZERO {
            return Err(RepoError::Validation(
                "basic_salary must be positive".to_string(),
            ));
        }

        let now = Utc::now();
        let row = PfContribution {
            id: None,
            emp_id: emp_id.to_string(),
            month: data.month,
            year: data.year,
            basic_salary: data.basic_salary,
            is_processed: false,
            payment_date: data.payment_date,
            created_at: now,
            updated_at: now,
        };

        let mut result = self
            .base
            .db()
            .query("CREATE pf_contribution CONTENT $row")
            .bind(("row", row))
            .await
            .map_err(|e| classify_month_conflict(e, "PF contribution"))?;
        let created: Option<PfContribution> = result
            .take(0)
            .map_err(|e| classify_month_conflict(e, "PF contribution"))?;
        created.ok_or_else(|| RepoError::Database("Failed to record PF contribution".to_string()))
    }

    // ── Tax deductions ──────────────────────────────────────────────

    pub async fn tax_deductions_for(&self, emp_id: &str) -> RepoResult<Vec<TaxDeduction>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM tax_deduction WHERE emp_id = $emp_id ORDER BY year DESC, month DESC",
            )
            .bind(("emp_id", emp_id))
            .await?;
        let rows: Vec<TaxDeduction> = result.take(0)?;
        Ok(rows)
    }

    pub async fn record_tax_deduction(
        &self,
        emp_id: &str,
        data: TaxDeductionCreate,
    ) -> RepoResult<TaxDeduction> {
        validate_month_year(data.month, data.year)?;

        let now = Utc::now();
        let row = TaxDeduction {
            id: None,
            emp_id: emp_id.to_string(),
            month: data.month,
            year: data.year,
            monthly_tax_deduction: data.monthly_tax_deduction,
            professional_tax: data.professional_tax,
            tds_deduction: data.tds_deduction,
            other_deductions: data.other_deductions,
            deduction_remarks: data.deduction_remarks,
            is_processed: false,
            created_at: now,
            updated_at: now,
        };

        let mut result = self
            .base
            .db()
            .query("CREATE tax_deduction CONTENT $row")
            .bind(("row", row))
            .await
            .map_err(|e| classify_month_conflict(e, "Tax deduction"))?;
        let created: Option<TaxDeduction> = result
            .take(0)
            .map_err(|e| classify_month_conflict(e, "Tax deduction"))?;
        created.ok_or_else(|| RepoError::Database("Failed to record tax deduction".to_string()))
    }

    // ── Personal info ───────────────────────────────────────────────

    pub async fn personal_info_for(&self, emp_id: &str) -> RepoResult<Option<PersonalInfo>> {
        let rid = RecordId::from_table_key("personal_info", emp_id);
        let info: Option<PersonalInfo> = self.base.db().select(rid).await?;
        Ok(info)
    }

    pub async fn upsert_personal_info(
        &self,
        emp_id: &str,
        data: PersonalInfoUpsert,
    ) -> RepoResult<PersonalInfo> {
        let rid = RecordId::from_table_key("personal_info", emp_id);
        let now = Utc::now();
        let existing = self.personal_info_for(emp_id).await?;

        let row = PersonalInfo {
            id: None,
            emp_id: emp_id.to_string(),
            about: data.about,
            interests_and_hobbies: data.interests_and_hobbies,
            skills: data.skills,
            certifications: data.certifications,
            date_of_birth: data.date_of_birth,
            residing_address: data.residing_address,
            nationality: data.nationality,
            personal_email: data.personal_email,
            gender: data.gender,
            marital_status: data.marital_status,
            created_at: existing.as_ref().map(|e| e.created_at).unwrap_or(now),
            updated_at: now,
        };

        let saved: Option<PersonalInfo> = match existing {
            Some(_) => self.base.db().update(rid).content(row).await?,
            None => self.base.db().create(rid).content(row).await?,
        };
        saved.ok_or_else(|| RepoError::Database("Failed to save personal info".to_string()))
    }
}

/// Map a unique (emp_id, month, year) index violation to a Duplicate error
fn classify_month_conflict(err: surrealdb::Error, what: &str) -> RepoError {
    let msg = err.to_string();
    if msg.contains("_emp_month_year") {
        RepoError::Duplicate(format!("{what} already recorded for that month"))
    } else {
        RepoError::Database(msg)
    }
}
