use async_trait::async_trait;
use log::debug;
use registry_provider::Customer;
use serde::{Deserialize, Serialize};

use crate::{ApiError, CustomerDef, CustomerDetailsDef, CustomerService, IntoApiResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CustomerApiRequest {
    GetCustomers,
    GetCustomer { id: String },
    CreateCustomer { definition: CustomerDef },
    UpdateCustomer { definition: CustomerDef },
    DeleteCustomer { id: String },
}

impl CustomerApiRequest {
    pub fn is_writing_request(&self) -> bool {
        matches!(
            &self,
            Self::CreateCustomer { .. } | Self::UpdateCustomer { .. } | Self::DeleteCustomer { .. }
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CustomerApiResponse {
    Error(ApiError),

    Unit,
    Customer(CustomerDef),
    Customers(Vec<CustomerDef>),
}

fn unexpected(response: CustomerApiResponse) -> poem::Error {
    ApiError::InternalError(format!("Unexpected response {:?}", response)).into()
}

impl CustomerApiResponse {
    pub fn into_unit(self) -> poem::Result<()> {
        match self {
            CustomerApiResponse::Error(e) => Err(e.into()),
            CustomerApiResponse::Unit => Ok(()),
            v => Err(unexpected(v)),
        }
    }

    pub fn into_customer(self) -> poem::Result<CustomerDef> {
        match self {
            CustomerApiResponse::Error(e) => Err(e.into()),
            CustomerApiResponse::Customer(v) => Ok(v),
            v => Err(unexpected(v)),
        }
    }

    pub fn into_customer_details(self) -> poem::Result<CustomerDetailsDef> {
        self.into_customer().map(|c| c.customer_details)
    }

    pub fn into_customers(self) -> poem::Result<Vec<CustomerDef>> {
        match self {
            CustomerApiResponse::Error(e) => Err(e.into()),
            CustomerApiResponse::Customers(v) => Ok(v),
            v => Err(unexpected(v)),
        }
    }
}

impl From<ApiError> for CustomerApiResponse {
    fn from(v: ApiError) -> Self {
        Self::Error(v)
    }
}

impl From<()> for CustomerApiResponse {
    fn from(_: ()) -> Self {
        Self::Unit
    }
}

impl From<Customer> for CustomerApiResponse {
    fn from(v: Customer) -> Self {
        Self::Customer(v.into())
    }
}

impl From<Vec<Customer>> for CustomerApiResponse {
    fn from(v: Vec<Customer>) -> Self {
        Self::Customers(v.into_iter().map(CustomerDef::from).collect())
    }
}

impl<T, E> From<Result<T, E>> for CustomerApiResponse
where
    CustomerApiResponse: From<T> + From<E>,
{
    fn from(v: Result<T, E>) -> Self {
        match v {
            Ok(t) => t.into(),
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
pub trait CustomerApiProvider: Sync + Send {
    async fn request(&self, request: CustomerApiRequest) -> CustomerApiResponse;
}

#[async_trait]
impl CustomerApiProvider for CustomerService {
    async fn request(&self, request: CustomerApiRequest) -> CustomerApiResponse {
        if request.is_writing_request() {
            debug!("Writing request: {:?}", request);
        }
        match request {
            CustomerApiRequest::GetCustomers => {
                self.get_all_customers().await.map_api_error().into()
            }
            CustomerApiRequest::GetCustomer { id } => {
                self.get_customer_by_id(&id).await.map_api_error().into()
            }
            CustomerApiRequest::CreateCustomer { definition } => self
                .add_customer(&definition.into())
                .await
                .map_api_error()
                .into(),
            CustomerApiRequest::UpdateCustomer { definition } => self
                .update_customer(&definition.into())
                .await
                .map_api_error()
                .into(),
            CustomerApiRequest::DeleteCustomer { id } => {
                self.delete_customer(&id).await.map_api_error().into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use registry_provider::Customer;
    use sql_provider::MemoryStore;

    use super::*;

    fn hardik() -> CustomerDef {
        Customer::new("hs", "hardik", "udaipur", 9999999999).into()
    }

    #[test]
    fn test_is_writing_request() {
        assert!(!CustomerApiRequest::GetCustomers.is_writing_request());
        assert!(!CustomerApiRequest::GetCustomer { id: "hs".to_string() }.is_writing_request());
        assert!(CustomerApiRequest::CreateCustomer { definition: hardik() }.is_writing_request());
        assert!(CustomerApiRequest::UpdateCustomer { definition: hardik() }.is_writing_request());
        assert!(CustomerApiRequest::DeleteCustomer { id: "hs".to_string() }.is_writing_request());
    }

    #[tokio::test]
    async fn test_request() {
        let service = CustomerService::new(Arc::new(MemoryStore::new()));

        service
            .request(CustomerApiRequest::CreateCustomer { definition: hardik() })
            .await
            .into_unit()
            .unwrap();
        assert_eq!(
            service
                .request(CustomerApiRequest::GetCustomers)
                .await
                .into_customers()
                .unwrap(),
            vec![hardik()]
        );
        assert_eq!(
            service
                .request(CustomerApiRequest::GetCustomer { id: "hs".to_string() })
                .await
                .into_customer_details()
                .unwrap(),
            hardik().customer_details
        );
        match service
            .request(CustomerApiRequest::CreateCustomer { definition: hardik() })
            .await
        {
            CustomerApiResponse::Error(e) => {
                assert_eq!(e, ApiError::Conflict("customer exists".to_string()))
            }
            v => panic!("unexpected response {:?}", v),
        }
        service
            .request(CustomerApiRequest::DeleteCustomer { id: "hs".to_string() })
            .await
            .into_unit()
            .unwrap();
        match service
            .request(CustomerApiRequest::DeleteCustomer { id: "hs".to_string() })
            .await
        {
            CustomerApiResponse::Error(e) => {
                assert_eq!(e, ApiError::NotFoundError("customer not found".to_string()))
            }
            v => panic!("unexpected response {:?}", v),
        }
    }

    #[test]
    fn test_unexpected_response() {
        assert!(CustomerApiResponse::Unit.into_customers().is_err());
        assert!(CustomerApiResponse::Customers(vec![]).into_unit().is_err());
    }
}
