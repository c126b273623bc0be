use crate::error::{RollcallError, UnknownPaymentProviderSnafu};
use std::{fmt::Debug, str::FromStr, sync::Arc};

pub trait PaymentService: Debug + Send + Sync {
    ///processes a payment, returning which gateway handled it
    fn pay(&self) -> String;
}

#[derive(Debug)]
pub struct RazorPayPaymentService;

impl PaymentService for RazorPayPaymentService {
    fn pay(&self) -> String {
        let payment = "RazorPay Payment Gateway";
        info!(
            gateway = payment,
            method = "UPI/Cards/NetBanking",
            region = "India",
            currency = "INR",
            "Processing payment"
        );
        payment.to_string()
    }
}

#[derive(Debug)]
pub struct StripePaymentService;

impl PaymentService for StripePaymentService {
    fn pay(&self) -> String {
        let payment = "Stripe Payment Gateway";
        info!(
            gateway = payment,
            method = "Credit/Debit Cards",
            region = "Global",
            currency = "Multi-currency",
            "Processing payment"
        );
        payment.to_string()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaymentProvider {
    #[default]
    RazorPay,
    Stripe,
}

impl FromStr for PaymentProvider {
    type Err = RollcallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "razorpay" => Ok(Self::RazorPay),
            "stripe" => Ok(Self::Stripe),
            _ => UnknownPaymentProviderSnafu { value: s }.fail(),
        }
    }
}

impl PaymentProvider {
    pub fn service(self) -> Arc<dyn PaymentService> {
        match self {
            Self::RazorPay => Arc::new(RazorPayPaymentService),
            Self::Stripe => Arc::new(StripePaymentService),
        }
    }
}
