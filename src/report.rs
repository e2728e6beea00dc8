//! presentation of simulation results as text and json
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::simulation::SimulationResult;
use crate::types::{SimulationId, VerdictStatus};

const DATE_FORMAT: &str = "%d/%m/%Y";

fn brl(amount: Money) -> String {
    format!("R$ {:.2}", amount.as_decimal())
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

fn date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// multi-line breakdown shown to the applicant
pub fn render_text(result: &SimulationResult) -> String {
    let request = &result.request;
    let mut lines = vec![
        format!("Resultado: {}", result.status()),
        String::new(),
        format!("Valor do Contrato: {}", brl(request.contract_value)),
        format!("Valor de Entrada: {}", brl(request.down_payment)),
    ];

    let (schedule, metrics) = match (&result.schedule, &result.verdict.metrics) {
        (Some(schedule), Some(metrics)) => (schedule, metrics),
        _ => {
            lines.push(format!("Renda Mensal: {}", brl(request.monthly_income)));
            lines.push(format!(
                "Data de início da obra: {}",
                date(request.construction_start_date)
            ));
            lines.push(format!("Meses até Habite-se: {}", result.months_until_habite_se));
            lines.push("Data da última parcela: Não se aplica (pagamento à vista)".to_string());
            lines.push(String::new());
            lines.push(
                "O valor da entrada é suficiente para cobrir o valor do contrato. \
                 Não há necessidade de financiamento."
                    .to_string(),
            );
            return lines.join("\n");
        }
    };

    lines.push(format!("Valor Financiado: {}", brl(result.financed_amount)));
    lines.push(format!("Parcela durante obra: {}", brl(metrics.construction_payment)));
    lines.push(format!("Parcela pós-obra: {}", brl(metrics.post_construction_payment)));
    lines.push(format!("Parcela anual: {}", brl(metrics.annual_capacity)));
    lines.push(format!("Parcela semestral: {}", brl(metrics.semiannual_capacity)));
    lines.push(format!("Meses até Habite-se: {}", result.months_until_habite_se));
    lines.push(format!(
        "Comprometimento de renda (obra): {}",
        percent(metrics.construction_income_ratio)
    ));
    lines.push(format!(
        "Comprometimento de renda (pós-obra): {}",
        percent(metrics.post_construction_income_ratio)
    ));
    lines.push(format!("Total de juros: {}", brl(schedule.total_interest)));
    lines.push(format!("CET: {}", percent(schedule.effective_annual_cost.as_percentage())));
    lines.push(format!("VGV: {}", brl(metrics.vgv)));
    lines.push(format!(
        "Parcela pós-obra em relação ao VGV: {}",
        percent(metrics.post_construction_vgv_ratio)
    ));
    lines.push(format!(
        "Data de início da obra: {}",
        date(request.construction_start_date)
    ));
    lines.push(format!("Número total de parcelas: {}", schedule.total_installments()));
    if let Some(final_date) = result.final_installment_date {
        lines.push(format!("Data da última parcela: {}", date(final_date)));
    }
    if let Some(last) = schedule.last_payment() {
        lines.push(format!("Valor da última parcela: {}", brl(last)));
    }

    if !result.verdict.approved {
        lines.push(String::new());
        lines.push("Motivos da reprovação:".to_string());
        lines.extend(result.verdict.reason_messages());
    }

    lines.join("\n")
}

/// compact serializable summary, installments left out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationView {
    pub id: SimulationId,
    pub product_name: String,
    pub status: VerdictStatus,
    pub contract_value: Money,
    pub down_payment: Money,
    pub monthly_income: Money,
    pub financed_amount: Money,
    pub construction_start_date: NaiveDate,
    pub months_until_habite_se: i32,
    pub construction_payment: Option<Money>,
    pub post_construction_payment: Option<Money>,
    pub total_interest: Money,
    pub vgv: Money,
    pub effective_annual_cost_percentage: Decimal,
    pub total_installments: u32,
    pub final_installment_date: Option<NaiveDate>,
    pub last_installment_amount: Option<Money>,
    pub reasons: Vec<String>,
}

impl SimulationView {
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            id: result.id,
            product_name: result.product_name.clone(),
            status: result.status(),
            contract_value: result.request.contract_value,
            down_payment: result.request.down_payment,
            monthly_income: result.request.monthly_income,
            financed_amount: result.financed_amount,
            construction_start_date: result.request.construction_start_date,
            months_until_habite_se: result.months_until_habite_se,
            construction_payment: result.construction_payment(),
            post_construction_payment: result.post_construction_payment(),
            total_interest: result.total_interest(),
            vgv: result.vgv(),
            effective_annual_cost_percentage: result.effective_annual_cost().as_percentage(),
            total_installments: result.total_installments(),
            final_installment_date: result.final_installment_date,
            last_installment_amount: result.last_installment_amount(),
            reasons: result.verdict.reason_messages(),
        }
    }
}

/// pretty json summary of a result
pub fn render_json(result: &SimulationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SimulationView::from_result(result))?)
}
