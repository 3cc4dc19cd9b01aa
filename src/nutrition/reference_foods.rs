//! Built-in reference composition table
//!
//! A subset of TACO (Tabela Brasileira de Composicao de Alimentos, UNICAMP/NEPA).
//! Values are per 100 g; added sugars are zero for raw ingredients.

use crate::models::{MaterialCreate, Nutrition};
use crate::nutrition::MeasureUnit;

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: usize = 8;

/// One entry of the reference table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFood {
    pub name: &'static str,
    /// Per 100 g, in label order
    per_100g: [f64; 10],
}

const fn food(name: &'static str, per_100g: [f64; 10]) -> ReferenceFood {
    ReferenceFood { name, per_100g }
}

impl ReferenceFood {
    /// Composition per 100 g
    pub fn nutrition(&self) -> Nutrition {
        Nutrition::from_fn(|n| self.per_100g[n.index()])
    }

    /// Material input prefilled from this entry
    pub fn to_material(&self, price_per_100: f64) -> MaterialCreate {
        MaterialCreate {
            name: self.name.to_string(),
            unit: MeasureUnit::Grams,
            nutrition: self.nutrition(),
            price_per_100,
            tags: vec!["taco".to_string()],
        }
    }
}

// calories, carbs, total sugars, added sugars, protein, total fat,
// saturated fat, trans fat, fiber, sodium (mg)
pub const TACO_FOODS: &[ReferenceFood] = &[
    // Cereais e farinhas
    food("Arroz branco cozido", [128.0, 28.1, 0.0, 0.0, 2.5, 0.2, 0.1, 0.0, 1.6, 1.0]),
    food("Arroz integral cozido", [124.0, 25.8, 0.3, 0.0, 2.6, 1.0, 0.2, 0.0, 2.7, 1.0]),
    food("Farinha de trigo", [360.0, 75.1, 0.7, 0.0, 9.8, 1.4, 0.2, 0.0, 2.3, 1.0]),
    food("Farinha de trigo integral", [339.0, 65.6, 0.6, 0.0, 11.4, 1.9, 0.3, 0.0, 9.6, 3.0]),
    food("Farinha de milho (fuba)", [351.0, 79.1, 1.3, 0.0, 7.2, 1.5, 0.2, 0.0, 4.4, 1.0]),
    food("Farinha de mandioca", [361.0, 89.2, 1.1, 0.0, 1.2, 0.3, 0.1, 0.0, 6.4, 2.0]),
    food("Farinha de aveia", [394.0, 66.6, 0.9, 0.0, 14.0, 8.5, 1.5, 0.0, 9.1, 4.0]),
    food("Aveia em flocos", [394.0, 66.6, 0.9, 0.0, 13.9, 8.5, 1.5, 0.0, 9.1, 4.0]),
    food("Amido de milho (maisena)", [381.0, 91.9, 0.0, 0.0, 0.1, 0.1, 0.0, 0.0, 0.1, 2.0]),
    food("Polvilho doce", [351.0, 87.0, 0.0, 0.0, 0.5, 0.2, 0.0, 0.0, 0.4, 1.0]),
    food("Polvilho azedo", [351.0, 87.0, 0.0, 0.0, 0.5, 0.2, 0.0, 0.0, 0.4, 1.0]),
    food("Macarrao cozido", [102.0, 19.9, 0.6, 0.0, 3.4, 0.5, 0.1, 0.0, 1.5, 1.0]),

    // Acucares e doces
    food("Acucar cristal", [387.0, 99.5, 99.5, 99.5, 0.3, 0.0, 0.0, 0.0, 0.0, 1.0]),
    food("Acucar mascavo", [369.0, 94.5, 94.5, 94.5, 0.4, 0.0, 0.0, 0.0, 0.0, 30.0]),
    food("Acucar demerara", [376.0, 97.3, 97.3, 97.3, 0.2, 0.0, 0.0, 0.0, 0.0, 3.0]),
    food("Mel", [309.0, 84.0, 82.0, 0.0, 0.3, 0.0, 0.0, 0.0, 0.0, 5.0]),
    food("Chocolate em po", [378.0, 77.4, 60.0, 55.0, 5.2, 3.8, 2.3, 0.0, 5.6, 21.0]),
    food("Cacau em po", [312.0, 36.2, 1.8, 0.0, 22.4, 13.7, 8.1, 0.0, 33.2, 21.0]),
    food("Leite condensado", [321.0, 55.3, 55.3, 55.3, 7.4, 8.3, 5.2, 0.2, 0.0, 130.0]),
    food("Coco ralado", [572.0, 18.5, 6.2, 0.0, 5.5, 53.9, 47.8, 0.0, 15.3, 20.0]),
    food("Leite de coco", [182.0, 3.4, 2.4, 0.0, 1.6, 18.4, 16.3, 0.0, 0.0, 12.0]),

    // Ovos e laticinios
    food("Ovo de galinha inteiro", [143.0, 1.6, 0.8, 0.0, 13.0, 8.9, 3.1, 0.0, 0.0, 140.0]),
    food("Clara de ovo", [43.0, 1.0, 0.7, 0.0, 9.8, 0.0, 0.0, 0.0, 0.0, 153.0]),
    food("Gema de ovo", [352.0, 1.6, 0.6, 0.0, 16.3, 31.6, 10.0, 0.0, 0.0, 48.0]),
    food("Leite integral", [60.0, 4.7, 4.7, 0.0, 3.2, 3.3, 2.0, 0.1, 0.0, 52.0]),
    food("Leite desnatado", [35.0, 4.9, 4.9, 0.0, 3.4, 0.2, 0.1, 0.0, 0.0, 52.0]),
    food("Leite em po integral", [497.0, 38.0, 38.0, 0.0, 26.3, 26.7, 16.7, 0.7, 0.0, 371.0]),
    food("Iogurte natural", [51.0, 5.5, 5.5, 0.0, 4.1, 1.4, 0.9, 0.0, 0.0, 52.0]),
    food("Creme de leite", [221.0, 3.5, 3.5, 0.0, 2.0, 22.5, 14.1, 0.6, 0.0, 32.0]),
    food("Requeijao cremoso", [257.0, 2.5, 2.5, 0.0, 7.5, 24.5, 15.3, 0.6, 0.0, 340.0]),
    food("Queijo mussarela", [330.0, 3.0, 1.0, 0.0, 22.6, 25.2, 15.8, 0.6, 0.0, 579.0]),
    food("Queijo parmesao", [453.0, 1.7, 0.8, 0.0, 33.5, 34.4, 21.5, 0.7, 0.0, 1602.0]),
    food("Queijo minas frescal", [264.0, 3.2, 2.5, 0.0, 17.4, 20.2, 12.6, 0.5, 0.0, 301.0]),

    // Gorduras e oleos
    food("Manteiga com sal", [726.0, 0.0, 0.0, 0.0, 0.4, 82.4, 51.6, 2.5, 0.0, 579.0]),
    food("Manteiga sem sal", [726.0, 0.0, 0.0, 0.0, 0.4, 82.4, 51.6, 2.5, 0.0, 11.0]),
    food("Margarina", [540.0, 0.1, 0.0, 0.0, 0.1, 60.0, 15.0, 6.0, 0.0, 800.0]),
    food("Oleo de soja", [884.0, 0.0, 0.0, 0.0, 0.0, 100.0, 15.6, 1.0, 0.0, 0.0]),
    food("Azeite de oliva", [884.0, 0.0, 0.0, 0.0, 0.0, 100.0, 14.0, 0.0, 0.0, 0.0]),
    food("Oleo de coco", [862.0, 0.0, 0.0, 0.0, 0.0, 100.0, 86.5, 0.0, 0.0, 0.0]),
    food("Banha de porco", [898.0, 0.0, 0.0, 0.0, 0.0, 99.8, 39.9, 0.0, 0.0, 0.0]),

    // Frutas
    food("Banana nanica", [92.0, 23.8, 15.4, 0.0, 1.4, 0.1, 0.0, 0.0, 1.9, 1.0]),
    food("Maca com casca", [56.0, 15.2, 13.3, 0.0, 0.3, 0.0, 0.0, 0.0, 1.3, 1.0]),
    food("Laranja pera", [37.0, 8.9, 8.2, 0.0, 1.0, 0.1, 0.0, 0.0, 0.8, 1.0]),
    food("Limao", [32.0, 11.1, 2.5, 0.0, 0.9, 0.1, 0.0, 0.0, 1.2, 1.0]),
    food("Morango", [30.0, 6.8, 5.3, 0.0, 0.9, 0.3, 0.0, 0.0, 1.7, 1.0]),
    food("Abacaxi", [48.0, 12.3, 9.9, 0.0, 0.9, 0.1, 0.0, 0.0, 1.0, 1.0]),
    food("Manga", [64.0, 16.7, 14.8, 0.0, 0.4, 0.3, 0.1, 0.0, 1.6, 1.0]),
    food("Maracuja (polpa)", [68.0, 12.3, 9.5, 0.0, 2.0, 2.1, 0.2, 0.0, 1.1, 8.0]),
    food("Acai (polpa)", [58.0, 6.2, 0.0, 0.0, 0.8, 3.9, 0.8, 0.0, 2.6, 5.0]),
    food("Goiaba vermelha", [54.0, 13.0, 8.9, 0.0, 1.1, 0.4, 0.1, 0.0, 6.2, 3.0]),

    // Legumes e verduras
    food("Cenoura crua", [34.0, 7.7, 3.2, 0.0, 1.3, 0.2, 0.0, 0.0, 3.2, 69.0]),
    food("Batata inglesa cozida", [52.0, 11.9, 0.8, 0.0, 1.2, 0.0, 0.0, 0.0, 1.2, 2.0]),
    food("Batata doce cozida", [77.0, 18.4, 5.7, 0.0, 0.6, 0.1, 0.0, 0.0, 2.2, 3.0]),
    food("Mandioca cozida", [125.0, 30.1, 1.4, 0.0, 0.6, 0.3, 0.1, 0.0, 1.6, 2.0]),
    food("Abobora cozida", [18.0, 4.3, 1.8, 0.0, 0.8, 0.1, 0.0, 0.0, 1.6, 1.0]),
    food("Tomate", [15.0, 3.1, 2.6, 0.0, 1.1, 0.2, 0.0, 0.0, 1.2, 5.0]),
    food("Cebola", [39.0, 8.9, 4.7, 0.0, 1.7, 0.1, 0.0, 0.0, 2.2, 2.0]),
    food("Alho", [113.0, 23.9, 1.0, 0.0, 7.0, 0.2, 0.0, 0.0, 4.3, 7.0]),
    food("Espinafre cozido", [16.0, 2.0, 0.2, 0.0, 2.0, 0.2, 0.0, 0.0, 2.1, 54.0]),

    // Leguminosas
    food("Feijao carioca cozido", [76.0, 13.6, 0.3, 0.0, 4.8, 0.5, 0.1, 0.0, 8.5, 2.0]),
    food("Feijao preto cozido", [77.0, 14.0, 0.3, 0.0, 4.5, 0.5, 0.1, 0.0, 8.4, 2.0]),
    food("Lentilha cozida", [93.0, 16.3, 1.0, 0.0, 6.3, 0.5, 0.1, 0.0, 7.9, 2.0]),
    food("Grao de bico cozido", [130.0, 18.3, 1.1, 0.0, 6.7, 2.6, 0.3, 0.0, 5.1, 5.0]),
    food("Soja cozida", [151.0, 8.5, 1.5, 0.0, 14.0, 7.6, 1.1, 0.0, 5.6, 1.0]),

    // Carnes
    food("Peito de frango cozido", [159.0, 0.0, 0.0, 0.0, 32.0, 3.2, 0.9, 0.0, 0.0, 51.0]),
    food("Carne bovina (acem) cozida", [215.0, 0.0, 0.0, 0.0, 26.7, 12.1, 4.8, 0.5, 0.0, 45.0]),
    food("Carne suina (lombo) assada", [210.0, 0.0, 0.0, 0.0, 27.0, 11.0, 4.0, 0.0, 0.0, 48.0]),
    food("Carne moida (patinho)", [212.0, 0.0, 0.0, 0.0, 26.4, 11.7, 4.7, 0.5, 0.0, 53.0]),
    food("Linguica calabresa", [262.0, 2.0, 0.0, 0.0, 15.0, 21.7, 8.0, 0.3, 0.0, 1149.0]),
    food("Presunto", [80.0, 1.2, 0.0, 0.0, 14.8, 1.8, 0.6, 0.0, 0.0, 1060.0]),
    food("Bacon", [556.0, 0.0, 0.0, 0.0, 24.0, 51.0, 17.4, 0.5, 0.0, 1440.0]),

    // Peixes
    food("Atum em conserva", [166.0, 0.0, 0.0, 0.0, 26.2, 6.4, 1.2, 0.0, 0.0, 396.0]),
    food("Sardinha em conserva", [208.0, 0.0, 0.0, 0.0, 24.6, 11.5, 3.4, 0.0, 0.0, 480.0]),

    // Oleaginosas
    food("Castanha de caju", [570.0, 29.1, 5.0, 0.0, 18.5, 46.3, 8.1, 0.0, 3.7, 9.0]),
    food("Amendoim torrado", [606.0, 18.7, 4.0, 0.0, 27.2, 49.4, 7.5, 0.0, 7.8, 5.0]),
    food("Castanha do para", [643.0, 15.1, 2.3, 0.0, 14.5, 63.5, 15.1, 0.0, 7.9, 2.0]),
    food("Noz", [620.0, 18.4, 2.6, 0.0, 14.4, 59.4, 5.6, 0.0, 5.2, 2.0]),

    // Temperos e condimentos
    food("Sal refinado", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 38758.0]),
    food("Fermento biologico", [72.0, 10.0, 3.0, 0.0, 8.4, 0.7, 0.1, 0.0, 3.3, 30.0]),
    food("Fermento em po quimico", [81.0, 33.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1, 9867.0]),
    food("Canela em po", [261.0, 55.5, 2.2, 0.0, 3.9, 3.2, 0.3, 0.0, 36.6, 26.0]),
    food("Gengibre", [46.0, 10.1, 1.7, 0.0, 1.3, 0.2, 0.1, 0.0, 2.8, 6.0]),
    food("Extrato de tomate", [61.0, 12.2, 9.0, 0.0, 3.1, 0.4, 0.1, 0.0, 3.0, 577.0]),

    // Bebidas base
    food("Agua de coco", [22.0, 5.3, 4.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 40.0]),
    food("Suco de laranja natural", [41.0, 10.0, 8.4, 0.0, 0.6, 0.1, 0.0, 0.0, 0.0, 0.0]),

    // Massas prontas
    food("Pao frances", [300.0, 58.6, 3.1, 0.0, 8.0, 3.1, 0.9, 0.1, 2.3, 648.0]),
    food("Pao de forma integral", [253.0, 46.0, 5.0, 3.0, 9.4, 3.7, 0.8, 0.0, 6.9, 472.0]),
    food("Biscoito cream cracker", [432.0, 68.7, 2.0, 0.0, 9.6, 14.4, 3.8, 1.2, 2.5, 854.0]),

    // Proteina vegetal
    food("Tofu", [64.0, 2.5, 0.6, 0.0, 6.6, 3.4, 0.5, 0.0, 0.2, 7.0]),
    food("Proteina de soja texturizada (PTS)", [296.0, 26.0, 3.0, 0.0, 46.0, 1.0, 0.2, 0.0, 16.0, 2.0]),
];

/// Entries whose name contains every whitespace-separated term of `query`
///
/// Matching ignores case; results keep table order.
pub fn search_reference_foods(query: &str, limit: usize) -> Vec<&'static ReferenceFood> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return Vec::new();
    }

    TACO_FOODS
        .iter()
        .filter(|food| {
            let name = food.name.to_lowercase();
            terms.iter().all(|t| name.contains(t))
        })
        .take(limit)
        .collect()
}

/// Exact, case-insensitive lookup by name
pub fn find_reference_food(name: &str) -> Option<&'static ReferenceFood> {
    let name = name.trim();
    TACO_FOODS.iter().find(|food| food.name.eq_ignore_ascii_case(name))
}
