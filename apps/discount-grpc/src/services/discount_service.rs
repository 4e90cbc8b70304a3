//! Discount gRPC service implementation.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         GetDiscount                                     │
//! │                                                                         │
//! │  { product_name: "IPhone X", code: "SPRING", base_price: "950.00" }    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse base_price ──► not a positive decimal? InvalidArgument          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.coupons().find_applicable(product_name, code)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  aggregate(base_price, coupons) ──► adjusted_price (exact decimal)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { coupons: [...], adjusted_price: "805.000" }                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Create/Update/Delete are admin operations. Update and Delete locate the
//! stored coupon by product name OR id, whichever matches first.

use std::sync::Arc;

use eshop_core::validation::validate_coupon;
use eshop_core::{aggregate, Coupon, CoreError};
use tonic::{Request, Response, Status};
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::mapping::parse_base_price;
use crate::proto::{
    discount_proto_service_server::DiscountProtoService, CouponModel, CreateDiscountRequest,
    DeleteDiscountRequest, DeleteDiscountResponse, GetDiscountRequest, GetDiscountResponse,
    UpdateDiscountRequest,
};
use crate::AppState;

/// Discount service implementation.
pub struct DiscountServiceImpl {
    state: Arc<AppState>,
}

impl DiscountServiceImpl {
    /// Create a new discount service.
    pub fn new(state: Arc<AppState>) -> Self {
        DiscountServiceImpl { state }
    }

    async fn get(&self, req: GetDiscountRequest) -> ServiceResult<GetDiscountResponse> {
        info!(product_name = %req.product_name, "Retrieving discount");

        let base_price = req.base_price.as_deref().map(parse_base_price).transpose()?;
        let code = Some(req.code.as_str()).filter(|c| !c.is_empty());

        let coupons = self
            .state
            .db
            .coupons()
            .find_applicable(&req.product_name, code)
            .await?;

        let adjusted_price = base_price.map(|price| aggregate(price, &coupons));

        info!(
            product_name = %req.product_name,
            coupons = coupons.len(),
            adjusted_price = ?adjusted_price.map(|p| p.to_string()),
            "Discount retrieved"
        );

        Ok(GetDiscountResponse {
            coupons: coupons.into_iter().map(CouponModel::from).collect(),
            adjusted_price: adjusted_price.map(|p| p.amount().to_string()),
        })
    }

    async fn create(&self, req: CreateDiscountRequest) -> ServiceResult<CouponModel> {
        let coupon = required_coupon(req.coupon)?;
        validate_coupon(&coupon)?;

        info!(product_name = %coupon.product_name, "Creating new discount");

        let stored = self.state.db.coupons().insert(&coupon).await?;

        info!(
            id = stored.id,
            product_name = %stored.product_name,
            amount = ?stored.amount.map(|a| a.to_string()),
            "Discount created"
        );
        Ok(stored.into())
    }

    async fn update(&self, req: UpdateDiscountRequest) -> ServiceResult<CouponModel> {
        let incoming = required_coupon(req.coupon)?;
        validate_coupon(&incoming)?;

        info!(product_name = %incoming.product_name, "Updating discount");

        let existing = self.locate(&incoming).await?;
        let updated = Coupon {
            id: existing.id,
            ..incoming
        };
        self.state.db.coupons().update(&updated).await?;

        info!(
            id = updated.id,
            product_name = %updated.product_name,
            amount = ?updated.amount.map(|a| a.to_string()),
            "Discount updated"
        );
        Ok(updated.into())
    }

    async fn delete(&self, req: DeleteDiscountRequest) -> ServiceResult<DeleteDiscountResponse> {
        let target = required_coupon(req.coupon)?;

        info!(product_name = %target.product_name, "Deleting discount");

        let existing = self.locate(&target).await?;
        self.state.db.coupons().delete(existing.id).await?;

        info!(id = existing.id, product_name = %existing.product_name, "Discount deleted");
        Ok(DeleteDiscountResponse { success: true })
    }

    /// Finds the stored coupon matching `coupon` by id or product name.
    async fn locate(&self, coupon: &Coupon) -> ServiceResult<Coupon> {
        self.state
            .db
            .coupons()
            .find_by_id_or_product(coupon.id, &coupon.product_name)
            .await?
            .ok_or_else(|| {
                CoreError::CouponNotFound {
                    product_name: coupon.product_name.clone(),
                    id: coupon.id,
                }
                .into()
            })
    }
}

/// Unwraps the coupon of an admin request.
fn required_coupon(model: Option<CouponModel>) -> ServiceResult<Coupon> {
    let model = model.ok_or_else(|| ServiceError::InvalidArgument("Coupon is required".to_string()))?;
    Ok(Coupon::try_from(model)?)
}

#[tonic::async_trait]
impl DiscountProtoService for DiscountServiceImpl {
    /// Eligible coupons and, when a base price is given, the adjusted price.
    async fn get_discount(
        &self,
        request: Request<GetDiscountRequest>,
    ) -> Result<Response<GetDiscountResponse>, Status> {
        Ok(Response::new(self.get(request.into_inner()).await?))
    }

    async fn create_discount(
        &self,
        request: Request<CreateDiscountRequest>,
    ) -> Result<Response<CouponModel>, Status> {
        Ok(Response::new(self.create(request.into_inner()).await?))
    }

    async fn update_discount(
        &self,
        request: Request<UpdateDiscountRequest>,
    ) -> Result<Response<CouponModel>, Status> {
        Ok(Response::new(self.update(request.into_inner()).await?))
    }

    async fn delete_discount(
        &self,
        request: Request<DeleteDiscountRequest>,
    ) -> Result<Response<DeleteDiscountResponse>, Status> {
        Ok(Response::new(self.delete(request.into_inner()).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::CouponType as ProtoCouponType;
    use crate::test_support::test_state;
    use eshop_core::Money;
    use tonic::Code;

    async fn service() -> DiscountServiceImpl {
        DiscountServiceImpl::new(test_state().await)
    }

    fn model(product_name: &str) -> CouponModel {
        CouponModel {
            product_name: product_name.to_string(),
            ..Default::default()
        }
    }

    async fn create(service: &DiscountServiceImpl, coupon: CouponModel) -> CouponModel {
        service
            .create_discount(Request::new(CreateDiscountRequest {
                coupon: Some(coupon),
            }))
            .await
            .unwrap()
            .into_inner()
    }

    async fn get(
        service: &DiscountServiceImpl,
        product_name: &str,
        code: &str,
        base_price: Option<&str>,
    ) -> Result<GetDiscountResponse, Status> {
        service
            .get_discount(Request::new(GetDiscountRequest {
                product_name: product_name.to_string(),
                code: code.to_string(),
                base_price: base_price.map(str::to_string),
            }))
            .await
            .map(Response::into_inner)
    }

    #[tokio::test]
    async fn test_get_discount_without_base_price() {
        let service = service().await;
        create(&service, CouponModel { percentage: Some(10.0), ..model("IPhone X") }).await;

        let response = get(&service, "IPhone X", "", None).await.unwrap();

        assert_eq!(response.coupons.len(), 1);
        assert_eq!(response.adjusted_price, None);
    }

    #[tokio::test]
    async fn test_get_discount_prices_with_code() {
        let service = service().await;
        create(&service, CouponModel { percentage: Some(10.0), ..model("IPhone X") }).await;
        create(
            &service,
            CouponModel {
                r#type: ProtoCouponType::Code as i32,
                code: Some("SPRING".to_string()),
                amount: Some("50.00".to_string()),
                ..model("IPhone X")
            },
        )
        .await;

        let without = get(&service, "IPhone X", "", Some("950.00")).await.unwrap();
        let price: Money = without.adjusted_price.unwrap().parse().unwrap();
        assert_eq!(price, Money::from_cents(85500));

        let with = get(&service, "IPhone X", "SPRING", Some("950.00")).await.unwrap();
        assert_eq!(with.coupons.len(), 2);
        let price: Money = with.adjusted_price.unwrap().parse().unwrap();
        assert_eq!(price, Money::from_cents(80500));
    }

    #[tokio::test]
    async fn test_get_discount_unknown_product_keeps_price() {
        let service = service().await;

        let response = get(&service, "Pixel", "SPRING", Some("19.99")).await.unwrap();

        assert!(response.coupons.is_empty());
        let price: Money = response.adjusted_price.unwrap().parse().unwrap();
        assert_eq!(price, Money::from_cents(1999));
    }

    #[tokio::test]
    async fn test_get_discount_rejects_bad_base_price() {
        let service = service().await;

        let status = get(&service, "IPhone X", "", Some("free")).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status = get(&service, "IPhone X", "", Some("0")).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_requires_coupon() {
        let service = service().await;

        let status = service
            .create_discount(Request::new(CreateDiscountRequest { coupon: None }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_validates() {
        let service = service().await;

        let status = service
            .create_discount(Request::new(CreateDiscountRequest {
                coupon: Some(CouponModel { percentage: Some(150.0), ..model("IPhone X") }),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status = service
            .create_discount(Request::new(CreateDiscountRequest {
                coupon: Some(CouponModel {
                    r#type: ProtoCouponType::Code as i32,
                    ..model("IPhone X")
                }),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let service = service().await;

        let created = create(&service, CouponModel { id: 99, percentage: Some(5.0), ..model("Pixel") }).await;

        assert!(created.id > 0);
        assert_ne!(created.id, 99);
    }

    #[tokio::test]
    async fn test_update_locates_by_product_name() {
        let service = service().await;

        let updated = service
            .update_discount(Request::new(UpdateDiscountRequest {
                coupon: Some(CouponModel {
                    percentage: Some(20.0),
                    description: "Spring sale".to_string(),
                    ..model("Samsung 10")
                }),
            }))
            .await
            .unwrap()
            .into_inner();

        assert!(updated.id > 0);
        assert_eq!(updated.description, "Spring sale");

        let response = get(&service, "Samsung 10", "", Some("100")).await.unwrap();
        assert_eq!(response.coupons.len(), 1);
        let price: Money = response.adjusted_price.unwrap().parse().unwrap();
        assert_eq!(price, Money::from_cents(8000));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let service = service().await;

        let status = service
            .update_discount(Request::new(UpdateDiscountRequest {
                coupon: Some(CouponModel { id: 404, ..model("Pixel") }),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service().await;

        let response = service
            .delete_discount(Request::new(DeleteDiscountRequest {
                coupon: Some(model("IPhone X")),
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(response.success);

        let status = service
            .delete_discount(Request::new(DeleteDiscountRequest {
                coupon: Some(model("IPhone X")),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);

        let status = service
            .delete_discount(Request::new(DeleteDiscountRequest { coupon: None }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }
}
