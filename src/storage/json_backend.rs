use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    domain::{budget_limit::truncate_to_month, BudgetLimit, Expense},
    errors::PlannerError,
    utils::{app_data_dir, ensure_dir},
};

use super::{Result, Storage};

const EXPENSES_FILE: &str = "expenses.json";
const LIMITS_FILE: &str = "budget_limits.json";
const TMP_SUFFIX: &str = "tmp";

/// File-backed storage keeping each aggregate in its own JSON document under
/// a root directory. Writes replace the whole document atomically (tmp file
/// then rename), and an interior mutex serializes the read-modify-write
/// cycles of the background loops and foreground callers.
pub struct JsonStorage {
    expenses_path: PathBuf,
    limits_path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStorage {
    /// Opens storage rooted at `root`, defaulting to the app data dir.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        Ok(Self {
            expenses_path: root.join(EXPENSES_FILE),
            limits_path: root.join(LIMITS_FILE),
            lock: Mutex::new(()),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    fn read_expenses(&self) -> Result<Vec<Expense>> {
        read_document(&self.expenses_path)
    }

    fn read_limits(&self) -> Result<Vec<BudgetLimit>> {
        read_document(&self.limits_path)
    }
}

impl Storage for JsonStorage {
    fn list_expenses(&self) -> Result<Vec<Expense>> {
        let _guard = self.lock.lock().unwrap();
        self.read_expenses()
    }

    fn insert_expense(&self, expense: &Expense) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut expenses = self.read_expenses()?;
        expenses.push(expense.clone());
        write_document(&self.expenses_path, &expenses)
    }

    fn update_expense(&self, expense: &Expense) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut expenses = self.read_expenses()?;
        match expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense.clone(),
            None => return Err(PlannerError::ExpenseNotFound(expense.id)),
        }
        write_document(&self.expenses_path, &expenses)
    }

    fn delete_expense(&self, id: Uuid) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut expenses = self.read_expenses()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != id);
        if expenses.len() == before {
            return Err(PlannerError::ExpenseNotFound(id));
        }
        write_document(&self.expenses_path, &expenses)
    }

    fn list_budget_limits(&self, month: Option<NaiveDate>) -> Result<Vec<BudgetLimit>> {
        let _guard = self.lock.lock().unwrap();
        let limits = self.read_limits()?;
        Ok(match month {
            Some(month) => {
                let key = truncate_to_month(month);
                limits.into_iter().filter(|l| l.month_year == key).collect()
            }
            None => limits,
        })
    }

    fn upsert_budget_limit(&self, limit: &BudgetLimit) -> Result<BudgetLimit> {
        let _guard = self.lock.lock().unwrap();
        let mut limits = self.read_limits()?;
        let stored = match limits
            .iter_mut()
            .find(|l| l.category == limit.category && l.month_year == limit.month_year)
        {
            Some(existing) => {
                let mut replacement = limit.clone();
                replacement.id = existing.id;
                *existing = replacement.clone();
                replacement
            }
            None => {
                limits.push(limit.clone());
                limit.clone()
            }
        };
        write_document(&self.limits_path, &limits)?;
        Ok(stored)
    }

    fn delete_budget_limit(&self, id: Uuid) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut limits = self.read_limits()?;
        let before = limits.len();
        limits.retain(|l| l.id != id);
        if limits.len() == before {
            return Err(PlannerError::LimitNotFound(id));
        }
        write_document(&self.limits_path, &limits)
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn write_document<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
