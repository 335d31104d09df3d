use crate::model::{Category, District, Province, Shop, Ward};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        CategoryResponse {
            category_id: value.category_id,
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopResponse {
    pub shop_id: i64,
    pub owner_id: i64,
    pub name: String,
    #[schema(value_type = Option<String>)]
    pub average_rating: Option<Decimal>,
}

impl From<Shop> for ShopResponse {
    fn from(value: Shop) -> Self {
        ShopResponse {
            shop_id: value.shop_id,
            owner_id: value.owner_id,
            name: value.name,
            average_rating: value.average_rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceResponse {
    pub province_id: i64,
    pub province_name: String,
}

impl From<Province> for ProvinceResponse {
    fn from(value: Province) -> Self {
        ProvinceResponse {
            province_id: value.province_id,
            province_name: value.province_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResponse {
    pub district_id: i64,
    pub district_name: String,
    pub province_id: i64,
}

impl From<District> for DistrictResponse {
    fn from(value: District) -> Self {
        DistrictResponse {
            district_id: value.district_id,
            district_name: value.district_name,
            province_id: value.province_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WardResponse {
    pub ward_id: i64,
    pub ward_name: String,
    pub district_id: i64,
}

impl From<Ward> for WardResponse {
    fn from(value: Ward) -> Self {
        WardResponse {
            ward_id: value.ward_id,
            ward_name: value.ward_name,
            district_id: value.district_id,
        }
    }
}
