use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct GetCompletedGroupsParams {
    pub user_id: i64,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct GetCertificateParams {
    pub user_id: i64,
}
