// ==========================================
// 纺织工厂管理系统 - 基础档案 API
// ==========================================
// 职责: 员工 / 股东 / 客户三类基础档案的维护
// 说明: 员工在职状态直接影响共同费用分摊口径（工资合计）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::personnel::{Client, Employee, Shareholder};
use crate::domain::types::EmployeeStatus;
use crate::repository::{ClientRepository, EmployeeRepository, ShareholderRepository};
use chrono::NaiveDate;

// ==========================================
// RegistryApi - 基础档案 API
// ==========================================
pub struct RegistryApi {
    /// 员工仓储
    employee_repo: Arc<EmployeeRepository>,
    /// 股东仓储
    shareholder_repo: Arc<ShareholderRepository>,
    /// 客户仓储
    client_repo: Arc<ClientRepository>,
}

impl RegistryApi {
    /// 创建新的 RegistryApi 实例
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        shareholder_repo: Arc<ShareholderRepository>,
        client_repo: Arc<ClientRepository>,
    ) -> Self {
        Self {
            employee_repo,
            shareholder_repo,
            client_repo,
        }
    }

    // ==========================================
    // 员工
    // ==========================================

    /// 新增员工（默认在职）
    pub fn create_employee(
        &self,
        name: &str,
        monthly_salary: f64,
        hire_date: Option<NaiveDate>,
    ) -> ApiResult<Employee> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("员工姓名不能为空".to_string()));
        }
        if monthly_salary < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "月工资不能为负: {}",
                monthly_salary
            )));
        }

        let employee = Employee::new(name.trim().to_string(), monthly_salary, hire_date);
        self.employee_repo.insert(&employee)?;
        Ok(employee)
    }

    /// 更新员工（姓名/工资/入职日期/在职状态）
    pub fn update_employee(
        &self,
        id: &str,
        name: &str,
        monthly_salary: f64,
        hire_date: Option<NaiveDate>,
        status: EmployeeStatus,
    ) -> ApiResult<()> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("员工姓名不能为空".to_string()));
        }
        if monthly_salary < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "月工资不能为负: {}",
                monthly_salary
            )));
        }

        let mut employee = self.employee_repo.get(id)?;
        employee.name = name.trim().to_string();
        employee.monthly_salary = monthly_salary;
        employee.hire_date = hire_date;
        employee.status = status;
        self.employee_repo.update(&employee)?;
        Ok(())
    }

    /// 查询全部员工
    pub fn list_employees(&self, include_deleted: bool) -> ApiResult<Vec<Employee>> {
        Ok(self.employee_repo.list(include_deleted)?)
    }

    /// 软删除员工（其工资即刻退出分摊口径）
    pub fn delete_employee(&self, id: &str, operator: &str) -> ApiResult<()> {
        self.employee_repo.soft_delete(id, operator)?;
        Ok(())
    }

    /// 恢复已软删除的员工
    pub fn restore_employee(&self, id: &str) -> ApiResult<()> {
        self.employee_repo.restore(id)?;
        Ok(())
    }

    // ==========================================
    // 股东
    // ==========================================

    /// 新增股东
    pub fn create_shareholder(
        &self,
        name: &str,
        phone: Option<String>,
        opening_balance: f64,
    ) -> ApiResult<Shareholder> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("股东名称不能为空".to_string()));
        }

        let shareholder =
            Shareholder::new(name.trim().to_string(), phone, opening_balance);
        self.shareholder_repo.insert(&shareholder)?;
        Ok(shareholder)
    }

    /// 查询全部股东
    pub fn list_shareholders(&self, include_deleted: bool) -> ApiResult<Vec<Shareholder>> {
        Ok(self.shareholder_repo.list(include_deleted)?)
    }

    /// 软删除股东
    pub fn delete_shareholder(&self, id: &str, operator: &str) -> ApiResult<()> {
        self.shareholder_repo.soft_delete(id, operator)?;
        Ok(())
    }

    /// 恢复已软删除的股东
    pub fn restore_shareholder(&self, id: &str) -> ApiResult<()> {
        self.shareholder_repo.restore(id)?;
        Ok(())
    }

    // ==========================================
    // 客户
    // ==========================================

    /// 新增客户
    pub fn create_client(&self, name: &str, phone: Option<String>) -> ApiResult<Client> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户名称不能为空".to_string()));
        }

        let client = Client::new(name.trim().to_string(), phone);
        self.client_repo.insert(&client)?;
        Ok(client)
    }

    /// 查询全部客户
    pub fn list_clients(&self, include_deleted: bool) -> ApiResult<Vec<Client>> {
        Ok(self.client_repo.list(include_deleted)?)
    }

    /// 软删除客户
    pub fn delete_client(&self, id: &str, operator: &str) -> ApiResult<()> {
        self.client_repo.soft_delete(id, operator)?;
        Ok(())
    }

    /// 恢复已软删除的客户
    pub fn restore_client(&self, id: &str) -> ApiResult<()> {
        self.client_repo.restore(id)?;
        Ok(())
    }
}
