//! プリミティブのBVHを構築・トラバースするモジュール。

use math::{Aabb, Ray};

use crate::{Hit, Primitive, PrimitiveIndex};

/// リストの要素数がこの値を下回ったら分割を打ち切り葉にする。
const LEAF_SIZE: usize = 4;

/// 分割候補を探す軸方向の中心の広がりがこの値を下回る軸はスキップする。
const AXIS_SPAN_EPSILON: f64 = 1e-4;

/// BVHのノード。
/// 内部ノードは左右の部分木を排他的に所有し、葉はプリミティブのインデックスを持つ。
/// 構築後は不変。
pub enum BvhNode {
    Interior {
        bounds: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
    Leaf {
        bounds: Aabb,
        primitives: Vec<PrimitiveIndex>,
    },
}
impl BvhNode {
    /// ノードのバウンディングボックスを取得する。
    pub fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Interior { bounds, .. } => bounds,
            BvhNode::Leaf { bounds, .. } => bounds,
        }
    }
}

/// 表面積ヒューリスティックで構築するBVH。
pub struct Bvh {
    root: BvhNode,
}
impl Bvh {
    /// (バウンディングボックス, プリミティブのインデックス)のリストからBVHを構築する。
    pub fn build(items: Vec<(Aabb, PrimitiveIndex)>) -> Self {
        Self {
            root: build_node(items, 0),
        }
    }

    /// ルートノードを取得する。
    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    /// 明示的なスタックでBVHをトラバースし、最も近いヒットを返す。
    /// 再帰を使わないため深さに上限がなく、ワーカースレッドのスタックにも優しい。
    pub fn intersect(&self, primitives: &[Box<dyn Primitive>], ray: &Ray) -> Option<Hit> {
        let mut stack = vec![&self.root];
        let mut closest: Option<Hit> = None;

        while let Some(node) = stack.pop() {
            match node {
                BvhNode::Interior {
                    bounds,
                    left,
                    right,
                } => {
                    if bounds.intersects(ray) {
                        stack.push(left);
                        stack.push(right);
                    }
                }
                BvhNode::Leaf {
                    primitives: leaf_primitives,
                    ..
                } => {
                    for &index in leaf_primitives {
                        if let Some(mut hit) = primitives[index.0].intersect(ray) {
                            if closest.as_ref().is_none_or(|c| hit.depth < c.depth) {
                                hit.primitive = index;
                                closest = Some(hit);
                            }
                        }
                    }
                }
            }
        }

        closest
    }

    /// 葉に含まれる全プリミティブのインデックスを収集する。
    pub fn leaf_primitives(&self) -> Vec<PrimitiveIndex> {
        fn collect(node: &BvhNode, out: &mut Vec<PrimitiveIndex>) {
            match node {
                BvhNode::Interior { left, right, .. } => {
                    collect(left, out);
                    collect(right, out);
                }
                BvhNode::Leaf { primitives, .. } => out.extend_from_slice(primitives),
            }
        }
        let mut out = vec![];
        collect(&self.root, &mut out);
        out
    }
}

/// アイテムのリストの全体を含むバウンディングボックスを計算する。
fn merged_bounds(items: &[(Aabb, PrimitiveIndex)]) -> Aabb {
    items
        .iter()
        .fold(Aabb::EMPTY, |bounds, (item, _)| bounds.merge(item))
}

/// 葉ノードを作成する。
fn make_leaf(items: Vec<(Aabb, PrimitiveIndex)>) -> BvhNode {
    BvhNode::Leaf {
        bounds: merged_bounds(&items),
        primitives: items.into_iter().map(|(_, index)| index).collect(),
    }
}

/// 表面積ヒューリスティックでトップダウンに再帰的にノードを構築する。
///
/// 3軸それぞれについて、一様なグリッド上の分割位置の候補を試し、
/// `area(left)·|L| + area(right)·|R|` が最小になる分割を選ぶ。
/// 分割しないコスト `|N|·area` を下回る候補が無ければ葉にする。
/// グリッドの幅は深さとともに粗くなるため、構築コストは深くなるほど減る。
fn build_node(items: Vec<(Aabb, PrimitiveIndex)>, depth: u32) -> BvhNode {
    if items.len() < LEAF_SIZE {
        return make_leaf(items);
    }

    let bounds = merged_bounds(&items);
    let mut min_cost = items.len() as f64 * bounds.area();
    let mut best: Option<(usize, f64)> = None;

    for axis in 0..3 {
        let start = bounds.min[axis];
        let stop = bounds.max[axis];

        // この軸で広がりが無ければ別の軸を試す。
        if (stop - start).abs() < AXIS_SPAN_EPSILON {
            continue;
        }

        let step = (stop - start) / (1024.0 / (depth as f64 + 1.0));

        let mut test_split = start + step;
        while test_split < stop - step {
            let mut left_bounds = Aabb::EMPTY;
            let mut right_bounds = Aabb::EMPTY;
            let mut count_left = 0usize;
            let mut count_right = 0usize;

            // バウンディングボックスの中心の座標で振り分ける。
            for (item_bounds, _) in &items {
                if item_bounds.center()[axis] < test_split {
                    left_bounds = left_bounds.merge(item_bounds);
                    count_left += 1;
                } else {
                    right_bounds = right_bounds.merge(item_bounds);
                    count_right += 1;
                }
            }

            // 片側に寄った分割は却下する。
            if count_left > 1 && count_right > 1 {
                let cost =
                    left_bounds.area() * count_left as f64 + right_bounds.area() * count_right as f64;
                // 同コストのときは先の軸・小さい分割位置が勝つよう、厳密な比較にする。
                if cost < min_cost {
                    min_cost = cost;
                    best = Some((axis, test_split));
                }
            }

            test_split += step;
        }
    }

    // 分割しないコストを下回る分割が見つからなければ葉にする。
    let Some((best_axis, best_split)) = best else {
        return make_leaf(items);
    };

    let mut left_items = vec![];
    let mut right_items = vec![];
    for (item_bounds, index) in items {
        if item_bounds.center()[best_axis] < best_split {
            left_items.push((item_bounds, index));
        } else {
            right_items.push((item_bounds, index));
        }
    }

    BvhNode::Interior {
        bounds,
        left: Box::new(build_node(left_items, depth + 1)),
        right: Box::new(build_node(right_items, depth + 1)),
    }
}
