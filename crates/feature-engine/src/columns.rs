//! Column names shared across stages

pub const CUSTOMER_ID_SOURCE: &str = "customerID";
pub const CUSTOMER_ID: &str = "customer_id";
pub const TENURE: &str = "tenure";
pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
pub const TOTAL_CHARGES: &str = "TotalCharges";
pub const PAYMENT_METHOD: &str = "PaymentMethod";
pub const CONTRACT: &str = "Contract";
pub const CHURN: &str = "Churn";

pub const TENURE_GROUP: &str = "tenure_group";
pub const CHARGES_PER_TENURE: &str = "charges_per_tenure";
pub const TOTAL_TO_MONTHLY_RATIO: &str = "total_to_monthly_ratio";
pub const AVG_MONTHLY_CHARGES: &str = "avg_monthly_charges";

pub const TOTAL_SERVICES: &str = "total_services";
pub const SERVICE_DENSITY: &str = "service_density";
pub const CUSTOMER_VALUE_SEGMENT: &str = "customer_value_segment";
pub const TENURE_STABILITY: &str = "tenure_stability";
pub const HIGH_RISK_PAYMENT: &str = "high_risk_payment";

pub const TENURE_MONTHLY_INTERACTION: &str = "tenure_monthly_interaction";
pub const TENURE_TOTAL_INTERACTION: &str = "tenure_total_interaction";
pub const SERVICES_CHARGES_INTERACTION: &str = "services_charges_interaction";
pub const CONTRACT_PAYMENT_INTERACTION: &str = "contract_payment_interaction";

pub const CREATED_TIMESTAMP: &str = "created_timestamp";
pub const UPDATED_TIMESTAMP: &str = "updated_timestamp";

/// Suffix marking label-encoded categorical columns
pub const ENCODED_SUFFIX: &str = "_encoded";
